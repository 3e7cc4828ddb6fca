//! DynamoDB infrastructure management commands.

mod client;
mod config;
mod deploy;
mod error;
mod planning;
mod seed;

pub use error::{DynamodbError, Result};

use crate::prelude::*;
use dialoguer::Confirm;
use ledger::config::DynamoDbConfig;
use ledger::storage::dynamodb::create_client;
use ledger::storage::DynamoDbRepository;

/// DynamoDB infrastructure management commands.
#[derive(Debug, clap::Parser)]
pub struct DynamodbCommand {
    #[command(subcommand)]
    pub action: DynamodbAction,
}

/// Available DynamoDB actions.
#[derive(Debug, clap::Subcommand)]
pub enum DynamodbAction {
    /// Deploy or destroy DynamoDB table infrastructure.
    Deploy(DeployCommand),

    /// Seed the table with sample transactions.
    Seed(SeedCommand),
}

/// Deploy or destroy DynamoDB infrastructure.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Deploy or destroy DynamoDB table infrastructure.

By default, this command creates the transactions table with a PK (HASH)
and SK (RANGE) key schema, billed per request. An existing table with the
right key schema is left untouched.

The command shows a plan of changes before applying and asks for confirmation.

Environment variables:
  AWS_ENDPOINT_URL    - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION          - AWS region (defaults to us-east-1)
  AWS_PROFILE         - AWS profile to use for credentials")]
pub struct DeployCommand {
    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,

    /// Destroy the table instead of creating it.
    #[arg(long)]
    pub destroy: bool,

    /// Table name to use.
    #[arg(long, default_value = "transactions", env = "DYNAMODB_TABLE_NAME")]
    pub table_name: String,
}

/// Seed the table with sample transactions.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Generate and insert sample transactions into DynamoDB.

Creates purchases, income and investments spread over a window of days.
The generated records only depend on the arguments, so running the same
seed twice overwrites the same transactions instead of duplicating them.")]
pub struct SeedCommand {
    /// First day of the window (defaults to the start of the default listing window).
    /// Format: YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<chrono::NaiveDate>,

    /// Number of days to spread transactions over.
    #[arg(long, default_value = "3")]
    pub days: u32,

    /// Number of transactions to generate.
    #[arg(long, default_value = "12")]
    pub count: u32,

    /// Table name to use.
    #[arg(long, default_value = "transactions", env = "DYNAMODB_TABLE_NAME")]
    pub table_name: String,

    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,
}

/// Main entry point for dynamodb command.
pub async fn run(command: DynamodbCommand, global: crate::Global) -> Result<()> {
    match command.action {
        DynamodbAction::Deploy(deploy_cmd) => run_deploy(deploy_cmd, &global).await,
        DynamodbAction::Seed(seed_cmd) => run_seed(seed_cmd, &global).await,
    }
}

fn aws_config(table_name: &str) -> DynamoDbConfig {
    DynamoDbConfig {
        table_name: table_name.to_string(),
        ..DynamoDbConfig::from_env()
    }
}

fn confirm(prompt: impl Into<String>, default: bool) -> Result<()> {
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?;

    if confirmed {
        Ok(())
    } else {
        Err(DynamodbError::UserCancelled)
    }
}

async fn run_deploy(cmd: DeployCommand, global: &crate::Global) -> Result<()> {
    let aws_config = aws_config(&cmd.table_name);

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!();
    }

    let dynamo_client = create_client(&aws_config).await;
    let current_state = client::get_table_state(&dynamo_client, &cmd.table_name).await?;

    if cmd.destroy {
        let plan = planning::calculate_destroy_plan(current_state.as_ref(), &cmd.table_name);

        if !global.is_silent() {
            aprintln!("{}", p_y("Destroy Plan:"));
            for line in planning::format_destroy_plan(&plan) {
                aprintln!("  {}", p_r(&line));
            }
            aprintln!();
        }

        if matches!(plan, planning::DestroyPlan::AlreadyGone { .. }) {
            if !global.is_silent() {
                aprintln!("{}", p_g("Nothing to destroy."));
            }
            return Ok(());
        }

        if !cmd.force {
            confirm(
                "Are you sure you want to delete this table? ALL DATA WILL BE LOST",
                false,
            )?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_b("Deleting table..."));
        }

        deploy::execute_destroy_plan(&dynamo_client, &plan).await?;

        if !global.is_silent() {
            aprintln!("{}", p_g("Table destroyed successfully."));
        }
    } else {
        let table_config = config::ledger_table_config().with_table_name(&cmd.table_name);

        let plan = planning::calculate_deploy_plan(current_state.as_ref(), &table_config);

        if !global.is_silent() {
            aprintln!("{}", p_c("Deploy Plan:"));
            for line in planning::format_deploy_plan(&plan) {
                if line.starts_with('+') {
                    aprintln!("  {}", p_g(&line));
                } else if line.starts_with('~') {
                    aprintln!("  {}", p_y(&line));
                } else {
                    aprintln!("  {}", line);
                }
            }
            aprintln!();
        }

        match plan {
            planning::DeployPlan::NoChanges { .. } => {
                if !global.is_silent() {
                    aprintln!("{}", p_g("Infrastructure is up to date."));
                }
                return Ok(());
            }
            planning::DeployPlan::KeySchemaMismatch { table_name, .. } => {
                return Err(DynamodbError::IncompatibleTable { table_name });
            }
            planning::DeployPlan::CreateTable { .. } => {}
        }

        if !cmd.force {
            confirm("Apply these changes?", true)?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_b("Applying changes..."));
        }

        deploy::execute_deploy_plan(&dynamo_client, &plan).await?;

        if !global.is_silent() {
            aprintln!("{}", p_g("Infrastructure deployed successfully."));
        }
    }

    Ok(())
}

async fn run_seed(cmd: SeedCommand, global: &crate::Global) -> Result<()> {
    let aws_config = aws_config(&cmd.table_name);
    let start_date = cmd.start_date.unwrap_or_else(|| {
        let today = chrono::Utc::now().date_naive();
        ledger_core::storage::DateRange::trailing_days(today, cmd.days).start
    });

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!("{} {}", p_b("Table:"), cmd.table_name);
        aprintln!("{} {}", p_b("Start date:"), start_date);
        aprintln!("{} {}", p_b("Days:"), cmd.days.max(1));
        aprintln!("{} {}", p_b("Transaction count:"), cmd.count);
        aprintln!();
    }

    let dynamo_client = create_client(&aws_config).await;

    // Verify table exists
    let table_state = client::get_table_state(&dynamo_client, &cmd.table_name).await?;
    if table_state.is_none() {
        return Err(DynamodbError::TableNotFound {
            table_name: cmd.table_name,
        });
    }

    let transactions = seed::generate_seed_transactions(start_date, cmd.days, cmd.count);

    if !global.is_silent() {
        aprintln!("{}", p_c("Transactions to create:"));
        for tx in transactions.iter().take(5) {
            aprintln!(
                "  {} - {} ({}, {})",
                tx.created_date(),
                tx.title,
                tx.transaction_type,
                tx.amount
            );
        }
        if transactions.len() > 5 {
            aprintln!("  ... and {} more", transactions.len() - 5);
        }
        aprintln!();
    }

    if !cmd.force {
        confirm(format!("Insert {} transactions?", transactions.len()), true)?;
    }

    let repo = DynamoDbRepository::new(dynamo_client, &cmd.table_name);
    let total = transactions.len();
    let inserted = seed::seed_transactions(&repo, &transactions, |i, tx| {
        if global.is_verbose() {
            aprintln!("  [{}/{}] Created: {} ({})", i + 1, total, tx.title, tx.key());
        }
    })
    .await?;

    if !global.is_silent() {
        aprintln!("{} {} transactions inserted.", p_g("Success:"), inserted);
    }

    Ok(())
}
