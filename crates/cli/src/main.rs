use clap::{Args, Parser, Subcommand};
use lifekey_core::config::data_file_from_env_value;
use lifekey_core::qr::{complete_payload, reference_payload};
use lifekey_core::{
    CoreConfig, FileRepository, LifeKeyResult, LookupRouter, PatientForm, PatientRecord,
    PatientStore, Resolved,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lifekey")]
#[command(about = "LifeKey emergency medical ID CLI")]
struct Cli {
    /// Patient store file
    #[arg(long, env = "LIFEKEY_DATA_FILE")]
    data_file: Option<PathBuf>,
    /// Remote LifeKey service for lookups (mock mode when unset)
    #[arg(long, env = "LIFEKEY_REMOTE_URL")]
    remote: Option<String>,
    /// Do not seed demo records into an empty store
    #[arg(long)]
    no_seed: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Profile fields as typed on a registration form.
#[derive(Args, Debug, Default)]
struct ProfileArgs {
    /// Full name
    #[arg(long, default_value = "")]
    name: String,
    /// Phone number
    #[arg(long, default_value = "")]
    phone: String,
    /// Age in years
    #[arg(long, default_value = "")]
    age: String,
    /// Blood group, e.g. O+
    #[arg(long, default_value = "")]
    blood_group: String,
    /// Allergies (comma-separated)
    #[arg(long, default_value = "")]
    allergies: String,
    /// Conditions (comma-separated)
    #[arg(long, default_value = "")]
    conditions: String,
    /// Medications (comma-separated)
    #[arg(long, default_value = "")]
    medications: String,
    /// Emergency contact phone number
    #[arg(long, default_value = "")]
    emergency_contact: String,
}

impl From<ProfileArgs> for PatientForm {
    fn from(args: ProfileArgs) -> Self {
        PatientForm {
            name: args.name,
            phone: args.phone,
            age: args.age,
            blood_group: args.blood_group,
            allergies: args.allergies,
            conditions: args.conditions,
            medications: args.medications,
            emergency_contact: args.emergency_contact,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Mint an unused LifeKey ID
    Mint,
    /// Register a patient under a new LifeKey ID
    Register(ProfileArgs),
    /// Replace a patient's profile
    Update {
        /// LifeKey ID
        id: String,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Look up a patient by LifeKey ID
    Lookup {
        /// LifeKey ID (any case)
        id: String,
    },
    /// List all patients
    List,
    /// Print QR payload text for a patient
    Qr {
        /// LifeKey ID
        id: String,
    },
    /// Resolve scanned QR text
    Scan {
        /// Text read from the QR code
        payload: String,
    },
}

fn print_record(record: &PatientRecord) {
    fn list_or_none(items: &[String]) -> String {
        if items.is_empty() {
            "None".to_string()
        } else {
            items.join(", ")
        }
    }

    println!("LifeKey ID: {}", record.id);
    println!("Name: {}", record.name);
    println!("Phone: {}", record.phone);
    if let Some(age) = record.age {
        println!("Age: {}", age);
    }
    println!(
        "Blood group: {}",
        record.blood_group.as_deref().unwrap_or("Not set")
    );
    println!("Allergies: {}", list_or_none(&record.allergies));
    println!("Conditions: {}", list_or_none(&record.conditions));
    println!("Medications: {}", list_or_none(&record.medications));
    println!(
        "Emergency contact: {}",
        record.emergency_contact.as_deref().unwrap_or("None")
    );
    println!("Last updated: {}", record.last_updated.to_rfc3339());
}

/// Opens the file-backed store, seeding it if configured.
fn open_store(cfg: &CoreConfig) -> LifeKeyResult<PatientStore> {
    PatientStore::open(
        FileRepository::new(cfg.data_file()),
        cfg.seed_demo_records(),
    )
}

/// Store for a responder lookup: none when a remote service answers lookups.
fn lookup_store(cfg: &CoreConfig, router: &LookupRouter) -> LifeKeyResult<Option<PatientStore>> {
    if router.is_remote() {
        return Ok(None);
    }
    open_store(cfg).map(Some)
}

async fn lookup(cfg: &CoreConfig, router: &LookupRouter, id: &str) -> LifeKeyResult<PatientRecord> {
    let store = lookup_store(cfg, router)?;
    router.resolve(store.as_ref(), id).await
}

async fn scan(cfg: &CoreConfig, router: &LookupRouter, payload: &str) -> LifeKeyResult<Resolved> {
    let store = lookup_store(cfg, router)?;
    router.resolve_scan(store.as_ref(), payload).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("lifekey_core=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_file = cli
        .data_file
        .unwrap_or_else(|| data_file_from_env_value(None));
    let cfg = match CoreConfig::new(data_file, cli.remote, !cli.no_seed) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error in configuration: {}", e);
            return Ok(());
        }
    };

    let router = LookupRouter::from_config(&cfg);

    let mut store = match cli.command {
        Some(Commands::Mint | Commands::Register(_) | Commands::Update { .. } | Commands::List) => {
            match open_store(&cfg) {
                Ok(store) => Some(store),
                Err(e) => {
                    eprintln!("Error opening patient store: {}", e);
                    return Ok(());
                }
            }
        }
        _ => None,
    };

    match (cli.command, store.as_mut()) {
        (Some(Commands::Mint), Some(store)) => match store.mint_id() {
            Ok(id) => println!("{}", id),
            Err(e) => eprintln!("Error minting LifeKey ID: {}", e),
        },
        (Some(Commands::Register(profile)), Some(store)) => {
            match PatientForm::from(profile)
                .validate()
                .and_then(|draft| store.register(draft))
            {
                Ok(record) => {
                    println!("Registered patient with LifeKey ID: {}", record.id);
                    print_record(&record);
                }
                Err(e) => eprintln!("Error registering patient: {}", e),
            }
        }
        (Some(Commands::Update { id, profile }), Some(store)) => {
            match PatientForm::from(profile)
                .validate()
                .and_then(|draft| store.replace(&id, draft))
            {
                Ok(record) => {
                    println!("Updated patient with LifeKey ID: {}", record.id);
                    print_record(&record);
                }
                Err(e) => eprintln!("Error updating patient: {}", e),
            }
        }
        (Some(Commands::Lookup { id }), _) => match lookup(&cfg, &router, &id).await {
            Ok(record) => print_record(&record),
            Err(e) if e.is_lookup_miss() => eprintln!("No patient found for ID: {}", id.trim()),
            Err(e) => eprintln!("Error looking up patient: {}", e),
        },
        (Some(Commands::List), Some(store)) => match store.list_all() {
            Ok(patients) if patients.is_empty() => println!("No patients found."),
            Ok(patients) => {
                for patient in patients {
                    println!(
                        "ID: {}, Name: {}, Phone: {}, Updated: {}",
                        patient.id,
                        patient.name,
                        patient.phone,
                        patient.last_updated.to_rfc3339()
                    );
                }
            }
            Err(e) => eprintln!("Error listing patients: {}", e),
        },
        (Some(Commands::Qr { id }), _) => match lookup(&cfg, &router, &id).await {
            Ok(record) => match complete_payload(&record, chrono::Utc::now()) {
                Ok(complete) => {
                    println!("Reference: {}", reference_payload(&record.id));
                    println!("Complete: {}", complete);
                }
                Err(e) => eprintln!("Error building QR payload: {}", e),
            },
            Err(e) if e.is_lookup_miss() => eprintln!("No patient found for ID: {}", id.trim()),
            Err(e) => eprintln!("Error building QR payload: {}", e),
        },
        (Some(Commands::Scan { payload }), _) => match scan(&cfg, &router, &payload).await {
            Ok(Resolved::Record(record)) => print_record(&record),
            Ok(Resolved::Card(card)) => {
                println!("Read from QR code (no lookup)");
                println!("LifeKey ID: {}", card.patient_id);
                println!("Name: {}", card.name);
                println!("Phone: {}", card.phone);
                println!(
                    "Blood group: {}",
                    card.blood_group.as_deref().unwrap_or("Not set")
                );
                println!("Allergies: {}", card.allergies.join(", "));
                println!("Conditions: {}", card.conditions.join(", "));
                println!("Medications: {}", card.medications.join(", "));
            }
            Err(e) if e.is_lookup_miss() => eprintln!("No patient found for scanned code"),
            Err(e) => eprintln!("Error reading QR code: {}", e),
        },
        (Some(_), None) => {}
        (None, _) => {
            println!("Use 'lifekey --help' for commands");
        }
    }

    Ok(())
}
