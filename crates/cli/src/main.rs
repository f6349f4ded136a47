use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use clarion_core::{
    resolve_rule_set, utc_offset_from_env_value, AnalysisReport, ChannelKey, ContentAnalyser,
    ContentSubmission, CoreConfig, PostingCadence, SourceTag, UserPreferences,
};
use std::path::PathBuf;
use std::sync::Arc;
use taxonomy::{RuleCategory, RuleSet};

#[derive(Parser)]
#[command(name = "clarion")]
#[command(about = "Clarion content idea analysis CLI")]
struct Cli {
    /// Alternative rule-set YAML file (defaults to CLARION_RULESET_PATH, then the built-in set)
    #[arg(long, global = true)]
    ruleset: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a content idea
    Analyse {
        /// The content idea text
        text: String,
        /// Where the text came from: voice, text, image or document
        #[arg(long, default_value = "text")]
        source: SourceTag,
        /// Healthcare specialty context, e.g. dermatology
        #[arg(long)]
        context: Option<String>,
        /// Preferred channel (repeatable, in order of preference)
        #[arg(long = "channel")]
        channels: Vec<String>,
        /// Posting cadence: daily or weekly
        #[arg(long)]
        cadence: Option<PostingCadence>,
        /// Target audience label
        #[arg(long)]
        audience: Option<String>,
        /// Moment to schedule from, RFC 3339 (defaults to now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List trigger phrases
    Rules {
        /// Only this category, e.g. prohibited-term
        #[arg(long)]
        category: Option<RuleCategory>,
    },
    /// List platform profiles
    Profiles,
    /// Validate a rule-set file
    CheckRuleset {
        /// Path to the YAML file
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let ruleset_path = cli
        .ruleset
        .or_else(|| std::env::var("CLARION_RULESET_PATH").ok().map(PathBuf::from));

    match cli.command {
        Some(Commands::Analyse {
            text,
            source,
            context,
            channels,
            cadence,
            audience,
            now,
            json,
        }) => {
            let rules = resolve_rule_set(ruleset_path)?;
            let offset = utc_offset_from_env_value(std::env::var("CLARION_UTC_OFFSET").ok())?;
            let analyser = ContentAnalyser::new(Arc::new(CoreConfig::new(rules, offset)));

            let preferred_channels = channels
                .iter()
                .map(ChannelKey::new)
                .collect::<Result<Vec<_>, _>>()?;
            let preferences = UserPreferences {
                preferred_channels,
                posting_cadence: cadence.unwrap_or_default(),
                target_audience: audience,
                practice_specialty: None,
            };
            let mut submission = ContentSubmission::new(text, source).with_preferences(preferences);
            if let Some(context) = context {
                submission = submission.with_context(context);
            }

            let runtime = tokio::runtime::Builder::new_current_thread().build()?;
            let now = now.unwrap_or_else(Utc::now);
            let report = runtime.block_on(analyser.analyse(submission, now))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Some(Commands::Rules { category }) => {
            let rules = resolve_rule_set(ruleset_path)?;
            println!("Rule set version {}", rules.version());
            let categories: Vec<RuleCategory> = match category {
                Some(c) => vec![c],
                None => RuleCategory::ALL.to_vec(),
            };
            for category in categories {
                let entries = rules.taxonomy().entries_by_category(category);
                println!(
                    "\n{} ({:?} severity, {} phrases)",
                    category,
                    category.severity(),
                    entries.len()
                );
                for entry in entries {
                    println!("  - {}", entry.phrase());
                }
            }
        }
        Some(Commands::Profiles) => {
            let rules = resolve_rule_set(ruleset_path)?;
            for p in rules.profiles().iter() {
                println!(
                    "{:<12} {:<18} {:?} {:02}:{:02}  max {} hashtags  tone: {}{}",
                    p.channel.as_str(),
                    p.display_name,
                    p.preferred_day,
                    p.preferred_hour,
                    p.preferred_minute,
                    p.max_hashtags,
                    p.tone,
                    if p.professional { "  [professional]" } else { "" }
                );
            }
        }
        Some(Commands::CheckRuleset { path }) => match RuleSet::from_file(&path) {
            Ok(rules) => println!(
                "{} is valid: version {}, {} phrases, {} channels",
                path.display(),
                rules.version(),
                rules.taxonomy().len(),
                rules.profiles().len()
            ),
            Err(e) => {
                eprintln!("Error in {}: {}", path.display(), e);
                return Err(e.into());
            }
        },
        None => {
            println!("Use 'clarion --help' for commands");
        }
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("Title:        {}", report.title);
    println!("Type:         {} (confidence {})", report.content_type, report.confidence);
    println!("Channel:      {} ({})", report.channel, report.tone);
    println!("Schedule:     {} ({})", report.schedule_label, report.scheduled_for.to_rfc3339());
    println!("Audience:     {}", report.target_audience);
    println!("Category:     {}", report.category);
    println!(
        "Compliance:   {}{}",
        report.compliance_risk,
        if report.requires_review { " - review required" } else { "" }
    );
    println!("Safe to post: {}", if report.safe_for_publication { "yes" } else { "no" });
    println!(
        "Scores:       engagement {}, educational {}",
        report.engagement_score, report.educational_value
    );
    println!("Keywords:     {}", report.keywords.join(", "));
    println!("Hashtags:     {}", report.hashtags.join(" "));
    println!("\n{}\n", report.enhanced_content);

    if !report.warnings.is_empty() {
        println!("Warnings:");
        for w in &report.warnings {
            println!("  ! {w}");
        }
    }
    println!("Recommendations:");
    for r in &report.recommendations {
        println!("  - {r}");
    }
    println!("\nRule set {}", report.ruleset_version);
}
