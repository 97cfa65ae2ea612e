use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commentflow::airtable::FieldDescriptor;
use commentflow::llm::load_prompt_template;
use commentflow::pipeline::aggregator::DEFAULT_COMBINED_FILE;
use commentflow::pipeline::UploadOutcome;
use commentflow::{
    Aggregator, AirtableClient, AirtableConfig, ClassifierConfig, ClassifierPipeline,
    OpenAiConfig, OpenAiProvider, Uploader,
};

#[derive(Parser, Debug)]
#[command(name = "commentflow")]
#[command(version = "0.1.0")]
#[command(about = "Classify YouTube comments with an LLM, combine the results and push them to Airtable")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge classified documents in a directory into one file
    Combine {
        /// Directory holding the classified `*.json` files
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Where the merged document is written
        #[arg(long, default_value = DEFAULT_COMBINED_FILE)]
        output: PathBuf,
    },

    /// Classify raw comment dumps with the completion API
    Classify {
        /// Directory of raw comment dumps
        #[arg(long, default_value = "comments")]
        input_dir: PathBuf,

        /// Directory for `processed_*.json` results
        #[arg(long, default_value = "comments/output")]
        output_dir: PathBuf,

        /// JSON file holding `openai_api_key`
        #[arg(long, default_value = "config.json")]
        config: PathBuf,

        /// Classification instructions sent as the system message
        #[arg(long, default_value = "prompt.txt")]
        prompt: PathBuf,

        /// Completion model id
        #[arg(long, default_value = commentflow::config::DEFAULT_MODEL)]
        model: String,

        /// Pause between written files, in seconds
        #[arg(long, default_value = "2")]
        delay_secs: u64,
    },

    /// Sync the Airtable schema and upload a classified document
    Upload {
        /// Classified document to upload
        #[arg(long, default_value = DEFAULT_COMBINED_FILE)]
        input: PathBuf,

        /// Create missing fields without asking
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("commentflow=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    match args.command {
        Command::Combine { dir, output } => {
            let summary = Aggregator::new(dir, output).run()?;
            println!(
                "Combined {} of {} files into {} ({} failed)",
                summary.files_merged,
                summary.files_seen,
                summary.output.display(),
                summary.files_failed
            );
        }

        Command::Classify {
            input_dir,
            output_dir,
            config,
            prompt,
            model,
            delay_secs,
        } => {
            let openai = OpenAiConfig::load(&config)?;
            let prompt = load_prompt_template(&prompt)?;

            let classifier_config = ClassifierConfig {
                input_dir,
                output_dir,
                model,
                file_delay: Duration::from_secs(delay_secs),
                ..ClassifierConfig::default()
            };

            let llm = OpenAiProvider::new(openai.openai_api_key, &classifier_config)?;
            tracing::info!("Classifying with model {}", llm.model());

            let pipeline = ClassifierPipeline::new(llm, prompt, classifier_config);
            let summary = pipeline.run().await?;
            println!(
                "Processed {} files, skipped {}, failed {}",
                summary.processed, summary.skipped, summary.failed
            );
        }

        Command::Upload { input, yes } => {
            let config = AirtableConfig::from_env()?;
            let uploader = Uploader::new(AirtableClient::new(&config)?);

            let outcome = uploader
                .run(&input, |missing| yes || confirm_field_creation(missing))
                .await?;

            match outcome {
                UploadOutcome::Declined => println!("No fields created, nothing uploaded."),
                UploadOutcome::Uploaded(summary) => println!(
                    "Upload complete! Successfully uploaded {} records.",
                    summary
                ),
            }
        }
    }

    Ok(())
}

fn confirm_field_creation(missing: &[FieldDescriptor]) -> bool {
    println!("\nMissing fields:");
    for field in missing {
        println!("  - {} ({})", field.name, field.kind.api_type());
    }
    print!("Would you like to proceed with creating the missing fields? (y/n): ");
    std::io::stdout().flush().ok();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("y")
}
