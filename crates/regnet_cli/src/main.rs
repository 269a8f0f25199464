//! RegNet CLI
//!
//! Runs registry operations against a ledger file.
//!
//! # Commands
//!
//! - one subcommand per operation, e.g. `purchase-property P1 Bob SSN2`
//! - `invoke` - Run an operation by `contract:function` name
//! - `inspect` - List ledger entries, decoded
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use commands::Session;
use regnet_core::Operation;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RegNet property registry client.
#[derive(Parser)]
#[command(name = "regnet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ledger file (created if missing)
    #[arg(global = true, short, long)]
    ledger: Option<PathBuf>,

    /// Identity recorded as the caller
    #[arg(global = true, short, long)]
    caller: Option<String>,

    /// Transaction timestamp in Unix seconds (defaults to now)
    #[arg(global = true, short, long)]
    timestamp: Option<i64>,

    /// JSON file mapping top-up codes to amounts
    #[arg(global = true, long)]
    top_up_table: Option<PathBuf>,

    /// Credit the previous owner when a property is purchased
    #[arg(global = true, long)]
    credit_seller: bool,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a new user account
    CreateUserRequest {
        name: String,
        email: String,
        phone: String,
        ssn: String,
    },

    /// Approve a pending user request
    ApproveNewUser { name: String, ssn: String },

    /// Top up a user balance
    RechargeAccount {
        name: String,
        ssn: String,
        top_up_code: String,
    },

    /// Show an active user
    ViewUser { name: String, ssn: String },

    /// Request registration of a property
    PropertyRegistrationRequest {
        prop_id: String,
        price: u64,
        owner_name: String,
        owner_ssn: String,
    },

    /// Approve a pending property registration
    ApprovePropertyRequest { prop_id: String },

    /// Show a registered property
    ViewProperty { prop_id: String },

    /// Change a property's status (registered, onSale)
    UpdateProperty {
        prop_id: String,
        status: String,
        owner_name: String,
        owner_ssn: String,
    },

    /// Buy a property that is on sale
    PurchaseProperty {
        prop_id: String,
        buyer_name: String,
        buyer_ssn: String,
    },

    /// Run an operation by name, e.g. `regnet.user:viewUser Alice SSN1`
    Invoke {
        /// Function name, optionally prefixed with its contract
        call: String,

        /// Positional arguments
        args: Vec<String>,
    },

    /// List ledger entries
    Inspect {
        /// Only show keys starting with this prefix
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Restrict to one namespace (request, user, property)
        #[arg(short, long, conflicts_with = "prefix")]
        namespace: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Show version information
    Version,
}

impl Commands {
    fn into_operation(self) -> Option<Operation> {
        let op = match self {
            Self::CreateUserRequest {
                name,
                email,
                phone,
                ssn,
            } => Operation::CreateUserRequest {
                name,
                email,
                phone,
                ssn,
            },
            Self::ApproveNewUser { name, ssn } => Operation::ApproveNewUser { name, ssn },
            Self::RechargeAccount {
                name,
                ssn,
                top_up_code,
            } => Operation::RechargeAccount {
                name,
                ssn,
                top_up_code,
            },
            Self::ViewUser { name, ssn } => Operation::ViewUser { name, ssn },
            Self::PropertyRegistrationRequest {
                prop_id,
                price,
                owner_name,
                owner_ssn,
            } => Operation::PropertyRegistrationRequest {
                prop_id,
                price,
                owner_name,
                owner_ssn,
            },
            Self::ApprovePropertyRequest { prop_id } => {
                Operation::ApprovePropertyRequest { prop_id }
            }
            Self::ViewProperty { prop_id } => Operation::ViewProperty { prop_id },
            Self::UpdateProperty {
                prop_id,
                status,
                owner_name,
                owner_ssn,
            } => Operation::UpdateProperty {
                prop_id,
                status,
                owner_name,
                owner_ssn,
            },
            Self::PurchaseProperty {
                prop_id,
                buyer_name,
                buyer_ssn,
            } => Operation::PurchaseProperty {
                prop_id,
                buyer_name,
                buyer_ssn,
            },
            Self::Invoke { .. } | Self::Inspect { .. } | Self::Version => return None,
        };
        Some(op)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let session = Session {
        ledger: cli.ledger,
        caller: cli.caller,
        timestamp: cli.timestamp,
        top_up_table: cli.top_up_table,
        credit_seller: cli.credit_seller,
    };

    match cli.command {
        Commands::Invoke { call, args } => {
            let op = Operation::from_call(&call, &args)?;
            commands::invoke::run(&session, op)?;
        }
        Commands::Inspect {
            prefix,
            namespace,
            format,
        } => {
            let path = session.ledger.as_deref().ok_or("Ledger path required for inspect")?;
            let prefix = match namespace {
                Some(ns) => regnet_codec::ObjectKey::namespace_prefix(&ns)?,
                None => prefix,
            };
            commands::inspect::run(path, &prefix, &format)?;
        }
        Commands::Version => {
            println!("RegNet CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("RegNet Core v{}", regnet_core::VERSION);
        }
        command => {
            let op = command
                .into_operation()
                .ok_or("Command is not a registry operation")?;
            commands::invoke::run(&session, op)?;
        }
    }

    Ok(())
}
