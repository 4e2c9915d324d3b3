use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use scoutdesk::config::RemoteConfig;
use scoutdesk::core::db::{
    ActivityRepository, AttendanceRepository, AuditRepository, ContactRepository,
    DirigenteRepository, DocumentRepository, FinanceRepository, GroupDb, MedicalRepository,
    NewActivity, NewAttendanceEntry, NewBudget, NewDirigente, NewDocumentEntry,
    NewDocumentationRecord, NewMedicalRecord, NewNewsPost, NewScout, NewSystemUser,
    NewTransaction, NewsRepository, RemoteConnector, ScoutRepository, ScoutUpdate,
    SystemUserUpdate, TransactionKind, UserRepository, DocumentationRepository, MemberStatus,
    today_iso,
};

#[derive(Parser)]
#[command(name = "scoutdesk")]
#[command(about = "Administrative console for a scout group")]
struct Cli {
    /// Directory holding local data (and fallback storage)
    #[arg(long, value_name = "DIR", default_value = "scoutdesk-data")]
    data_dir: PathBuf,

    /// Name recorded in the audit log for mutating commands
    #[arg(long, default_value = "console")]
    actor: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show which backend the console is operating against
    Status,
    /// Member registry
    #[command(subcommand)]
    Scouts(ScoutsCommand),
    /// Health records per scout
    #[command(subcommand)]
    Medical(MedicalCommand),
    /// Registration paperwork per scout
    #[command(subcommand)]
    Paperwork(PaperworkCommand),
    /// Activity attendance
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    /// Adult leader registry
    #[command(subcommand)]
    Dirigentes(DirigentesCommand),
    /// Activity calendar
    #[command(subcommand)]
    Activities(ActivitiesCommand),
    /// Transactions and budgets
    #[command(subcommand)]
    Finance(FinanceCommand),
    /// Contact-form messages
    #[command(subcommand)]
    Contacts(ContactsCommand),
    /// Announcements
    #[command(subcommand)]
    News(NewsCommand),
    /// Document registry
    #[command(subcommand)]
    Documents(DocumentsCommand),
    /// Console accounts
    #[command(subcommand)]
    Users(UsersCommand),
    /// Audit trail
    Audit {
        /// Cap the number of entries shown
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Archive all local data into FILE
    Backup { file: PathBuf },
    /// Restore local data from FILE
    Restore { file: PathBuf },
}

#[derive(Subcommand)]
enum ScoutsCommand {
    List {
        /// Restrict to one section (alcateia, tropa_escoteira, ...)
        #[arg(long)]
        section: Option<String>,
        /// Show the inactive-members view instead
        #[arg(long)]
        inactive: bool,
    },
    Add {
        name: String,
        #[arg(long)]
        section: String,
        #[arg(long)]
        birthdate: Option<String>,
        #[arg(long)]
        guardian: Option<String>,
        #[arg(long)]
        guardian_phone: Option<String>,
    },
    /// Flip a member between active and inactive
    SetStatus { id: i64, status: String },
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum MedicalCommand {
    Show { scout_id: i64 },
    Add {
        scout_id: i64,
        #[arg(long)]
        blood_type: Option<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        medications: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
enum PaperworkCommand {
    List { scout_id: i64 },
    Add {
        scout_id: i64,
        document: String,
        #[arg(long)]
        delivered: bool,
    },
    /// Mark a tracked document as delivered today
    Deliver { scout_id: i64, document: String },
}

#[derive(Subcommand)]
enum AttendanceCommand {
    List { activity_id: i64 },
    Record {
        activity_id: i64,
        scout_id: i64,
        #[arg(long)]
        absent: bool,
    },
    /// Presence percentages per section
    Summary,
}

#[derive(Subcommand)]
enum DirigentesCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        section: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum ActivitiesCommand {
    List,
    Add {
        title: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        section: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum FinanceCommand {
    Transactions {
        #[arg(long)]
        category: Option<String>,
    },
    AddTransaction {
        description: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        category: String,
        /// income or expense
        #[arg(long)]
        kind: String,
        /// Amount like 123.45
        #[arg(long)]
        amount: String,
    },
    RemoveTransaction { id: i64 },
    Budgets,
    SetBudget {
        #[arg(long)]
        category: String,
        /// YYYY-MM
        #[arg(long)]
        period: String,
        /// Limit like 500.00
        #[arg(long)]
        limit: String,
    },
    RemoveBudget { id: i64 },
    /// Totals and budget utilization
    Summary,
}

#[derive(Subcommand)]
enum ContactsCommand {
    List,
    MarkHandled { id: i64 },
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum NewsCommand {
    List,
    Publish {
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        date: Option<String>,
    },
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum DocumentsCommand {
    List {
        #[arg(long)]
        category: Option<String>,
    },
    Add {
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        url: String,
    },
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum UsersCommand {
    List,
    Add {
        username: String,
        #[arg(long)]
        password: String,
        /// admin, editor or viewer
        #[arg(long, default_value = "viewer")]
        role: String,
    },
    SetRole { username: String, role: String },
    Deactivate { username: String },
    Remove { username: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let connector = RemoteConnector::new(RemoteConfig::from_env());
    let db = GroupDb::connect(&connector, &args.data_dir).await?;

    if args.verbose {
        println!("Backend: {}", db.mode());
    }

    match args.command {
        Command::Status => {
            println!("Backend:    {}", db.mode());
            println!("Data dir:   {}", db.local().dir().display());
            println!("Local keys: {}", db.local().all_keys().len());
            println!("Local size: {:.1} KB", db.local().size_kb());
        }

        Command::Scouts(command) => run_scouts(&db, command).await?,
        Command::Medical(command) => run_medical(&db, command).await?,
        Command::Paperwork(command) => run_paperwork(&db, command).await?,
        Command::Attendance(command) => run_attendance(&db, command).await?,
        Command::Dirigentes(command) => run_dirigentes(&db, command).await?,
        Command::Activities(command) => run_activities(&db, command).await?,
        Command::Finance(command) => run_finance(&db, command).await?,
        Command::Contacts(command) => run_contacts(&db, command).await?,
        Command::News(command) => run_news(&db, command).await?,
        Command::Documents(command) => run_documents(&db, command).await?,
        Command::Users(command) => run_users(&db, command, &args.actor).await?,

        Command::Audit { limit } => {
            let entries = db.get_audit_entries(limit).await?;
            println!("=== Audit Log ({} entries) ===", entries.len());
            for entry in entries {
                println!(
                    "{}  {:<12} {:<14} {}",
                    entry.at,
                    entry.actor,
                    entry.action,
                    entry.detail.unwrap_or_default()
                );
            }
        }

        Command::Backup { file } => {
            db.local().backup(&file)?;
            println!("Backup written to {}", file.display());
        }
        Command::Restore { file } => {
            db.local().restore(&file)?;
            println!("Restored local data from {}", file.display());
        }
    }

    Ok(())
}

async fn run_scouts(db: &GroupDb, command: ScoutsCommand) -> anyhow::Result<()> {
    match command {
        ScoutsCommand::List { section, inactive } => {
            let scouts = if inactive {
                db.get_inactive_members().await?
            } else if let Some(section) = section {
                db.get_scouts_in_section(section.parse()?).await?
            } else {
                db.get_scouts().await?
            };
            println!("=== Scouts ({}) ===", scouts.len());
            for scout in scouts {
                println!(
                    "{:>14}  {:<30} {:<16} {}",
                    scout.id,
                    scout.name,
                    scout.section.label(),
                    scout.status
                );
            }
        }
        ScoutsCommand::Add {
            name,
            section,
            birthdate,
            guardian,
            guardian_phone,
        } => {
            let scout = db
                .add_scout(&NewScout {
                    name,
                    birthdate,
                    section: section.parse()?,
                    status: MemberStatus::Active,
                    guardian_name: guardian,
                    guardian_phone,
                    joined_at: Some(today_iso()?),
                })
                .await?;
            println!("Added scout \"{}\" (id {})", scout.name, scout.id);
        }
        ScoutsCommand::SetStatus { id, status } => {
            let scout = db
                .get_scout_by_id(id)
                .await?
                .with_context(|| format!("No scout with id {id}"))?;
            let update = ScoutUpdate {
                status: Some(status.parse()?),
                ..Default::default()
            };
            let scout = db.update_scout(&scout, &update).await?;
            println!("Scout \"{}\" is now {}", scout.name, scout.status);
        }
        ScoutsCommand::Remove { id } => {
            let scout = db
                .get_scout_by_id(id)
                .await?
                .with_context(|| format!("No scout with id {id}"))?;
            let name = scout.name.clone();
            db.delete_scout(scout).await?;
            println!("Removed scout \"{name}\"");
        }
    }
    Ok(())
}

async fn run_medical(db: &GroupDb, command: MedicalCommand) -> anyhow::Result<()> {
    match command {
        MedicalCommand::Show { scout_id } => {
            let records = db.get_medical_records(scout_id).await?;
            println!("=== Medical Records ({}) ===", records.len());
            for record in records {
                println!(
                    "{:>14}  blood: {:<4} allergies: {:<24} {}",
                    record.id,
                    record.blood_type.unwrap_or_default(),
                    record.allergies.unwrap_or_default(),
                    record.notes.unwrap_or_default()
                );
            }
        }
        MedicalCommand::Add {
            scout_id,
            blood_type,
            allergies,
            medications,
            notes,
        } => {
            let record = db
                .add_medical_record(&NewMedicalRecord {
                    scout_id,
                    blood_type,
                    allergies,
                    medications,
                    notes,
                })
                .await?;
            println!("Added medical record {} for scout {}", record.id, scout_id);
        }
    }
    Ok(())
}

async fn run_paperwork(db: &GroupDb, command: PaperworkCommand) -> anyhow::Result<()> {
    match command {
        PaperworkCommand::List { scout_id } => {
            let records = db.get_documentation_records(scout_id).await?;
            println!("=== Paperwork ({}) ===", records.len());
            for record in records {
                let delivered = if record.delivered {
                    format!("delivered {}", record.delivered_at.unwrap_or_default())
                } else {
                    "pending".to_string()
                };
                println!("{:>14}  {:<28} {}", record.id, record.document, delivered);
            }
        }
        PaperworkCommand::Add {
            scout_id,
            document,
            delivered,
        } => {
            let delivered_at = if delivered { Some(today_iso()?) } else { None };
            let record = db
                .add_documentation_record(&NewDocumentationRecord {
                    scout_id,
                    document,
                    delivered,
                    delivered_at,
                })
                .await?;
            println!("Tracking \"{}\" for scout {}", record.document, scout_id);
        }
        PaperworkCommand::Deliver { scout_id, document } => {
            let records = db.get_documentation_records(scout_id).await?;
            let record = records
                .into_iter()
                .find(|r| r.document == document)
                .with_context(|| format!("Scout {scout_id} has no tracked \"{document}\""))?;
            db.set_documentation_delivered(&record, true, Some(today_iso()?))
                .await?;
            println!("Marked \"{document}\" delivered for scout {scout_id}");
        }
    }
    Ok(())
}

async fn run_attendance(db: &GroupDb, command: AttendanceCommand) -> anyhow::Result<()> {
    match command {
        AttendanceCommand::List { activity_id } => {
            let entries = db.get_attendance_for_activity(activity_id).await?;
            println!("=== Attendance for activity {activity_id} ({}) ===", entries.len());
            for entry in entries {
                println!(
                    "{:>14}  scout {:<14} {}",
                    entry.id,
                    entry.scout_id,
                    if entry.present { "present" } else { "absent" }
                );
            }
        }
        AttendanceCommand::Record {
            activity_id,
            scout_id,
            absent,
        } => {
            db.record_attendance(&NewAttendanceEntry {
                scout_id,
                activity_id,
                present: !absent,
            })
            .await?;
            println!(
                "Recorded scout {} as {} for activity {}",
                scout_id,
                if absent { "absent" } else { "present" },
                activity_id
            );
        }
        AttendanceCommand::Summary => {
            let summaries = db.get_attendance_by_group().await?;
            println!("=== Attendance by Section ===");
            for summary in summaries {
                println!(
                    "{:<18} {:>4}/{:<4} {:>5.1}%",
                    summary.section.label(),
                    summary.present,
                    summary.recorded,
                    summary.rate_percent
                );
            }
        }
    }
    Ok(())
}

async fn run_dirigentes(db: &GroupDb, command: DirigentesCommand) -> anyhow::Result<()> {
    match command {
        DirigentesCommand::List => {
            let dirigentes = db.get_dirigentes().await?;
            println!("=== Dirigentes ({}) ===", dirigentes.len());
            for dirigente in dirigentes {
                println!(
                    "{:>14}  {:<30} {:<16} {}",
                    dirigente.id,
                    dirigente.name,
                    dirigente.role.label(),
                    dirigente
                        .section
                        .map(|s| s.label().to_string())
                        .unwrap_or_default()
                );
            }
        }
        DirigentesCommand::Add {
            name,
            role,
            section,
            email,
            phone,
        } => {
            let section = section.map(|s| s.parse()).transpose()?;
            let dirigente = db
                .add_dirigente(&NewDirigente {
                    name,
                    role: role.parse()?,
                    section,
                    email,
                    phone,
                    status: MemberStatus::Active,
                })
                .await?;
            println!("Added dirigente \"{}\" (id {})", dirigente.name, dirigente.id);
        }
        DirigentesCommand::Remove { id } => {
            let dirigente = db
                .get_dirigente_by_id(id)
                .await?
                .with_context(|| format!("No dirigente with id {id}"))?;
            let name = dirigente.name.clone();
            db.delete_dirigente(dirigente).await?;
            println!("Removed dirigente \"{name}\"");
        }
    }
    Ok(())
}

async fn run_activities(db: &GroupDb, command: ActivitiesCommand) -> anyhow::Result<()> {
    match command {
        ActivitiesCommand::List => {
            let activities = db.get_activities().await?;
            println!("=== Activities ({}) ===", activities.len());
            for activity in activities {
                println!(
                    "{:>14}  {:<10} {:<30} {}",
                    activity.id,
                    activity.date,
                    activity.title,
                    activity.location.unwrap_or_default()
                );
            }
        }
        ActivitiesCommand::Add {
            title,
            date,
            location,
            section,
            description,
        } => {
            let section = section.map(|s| s.parse()).transpose()?;
            let activity = db
                .add_activity(&NewActivity {
                    title,
                    date,
                    location,
                    section,
                    description,
                })
                .await?;
            println!("Added activity \"{}\" (id {})", activity.title, activity.id);
        }
        ActivitiesCommand::Remove { id } => {
            let activity = db
                .get_activity_by_id(id)
                .await?
                .with_context(|| format!("No activity with id {id}"))?;
            let title = activity.title.clone();
            db.delete_activity(activity).await?;
            println!("Removed activity \"{title}\"");
        }
    }
    Ok(())
}

async fn run_finance(db: &GroupDb, command: FinanceCommand) -> anyhow::Result<()> {
    match command {
        FinanceCommand::Transactions { category } => {
            let transactions = match category {
                Some(category) => db.get_transactions_in_category(category.parse()?).await?,
                None => db.get_transactions().await?,
            };
            println!("=== Transactions ({}) ===", transactions.len());
            for transaction in transactions {
                let signed = match transaction.kind {
                    TransactionKind::Income => {
                        format!("+{}", format_cents(transaction.amount_cents))
                    }
                    TransactionKind::Expense => {
                        format!("-{}", format_cents(transaction.amount_cents))
                    }
                };
                println!(
                    "{:>14}  {:<10} {:>12}  {:<16} {}",
                    transaction.id,
                    transaction.date,
                    signed,
                    transaction.category.label(),
                    transaction.description
                );
            }
        }
        FinanceCommand::AddTransaction {
            description,
            date,
            category,
            kind,
            amount,
        } => {
            let transaction = db
                .add_transaction(&NewTransaction {
                    date,
                    description,
                    category: category.parse()?,
                    kind: kind.parse()?,
                    amount_cents: parse_amount(&amount)?,
                })
                .await?;
            println!(
                "Recorded {} of {} (id {})",
                transaction.kind.as_str(),
                format_cents(transaction.amount_cents),
                transaction.id
            );
        }
        FinanceCommand::RemoveTransaction { id } => {
            let transaction = db
                .get_transactions()
                .await?
                .into_iter()
                .find(|t| t.id == id)
                .with_context(|| format!("No transaction with id {id}"))?;
            db.delete_transaction(transaction).await?;
            println!("Removed transaction {id}");
        }
        FinanceCommand::Budgets => {
            let budgets = db.get_budgets().await?;
            println!("=== Budgets ({}) ===", budgets.len());
            for budget in budgets {
                println!(
                    "{:>14}  {:<7} {:<16} {:>12}",
                    budget.id,
                    budget.period,
                    budget.category.label(),
                    format_cents(budget.limit_cents)
                );
            }
        }
        FinanceCommand::SetBudget {
            category,
            period,
            limit,
        } => {
            let budget = db
                .set_budget(&NewBudget {
                    category: category.parse()?,
                    limit_cents: parse_amount(&limit)?,
                    period,
                })
                .await?;
            println!(
                "Budget for {} in {} set to {}",
                budget.category.label(),
                budget.period,
                format_cents(budget.limit_cents)
            );
        }
        FinanceCommand::RemoveBudget { id } => {
            let budget = db
                .get_budgets()
                .await?
                .into_iter()
                .find(|b| b.id == id)
                .with_context(|| format!("No budget with id {id}"))?;
            db.delete_budget(budget).await?;
            println!("Removed budget {id}");
        }
        FinanceCommand::Summary => {
            let summary = db.get_finance_summary().await?;
            println!("=== Finance Summary ===");
            println!("Income:   {:>12}", format_cents(summary.income_cents));
            println!("Expenses: {:>12}", format_cents(summary.expense_cents));
            println!("Balance:  {:>12}", format_cents(summary.balance_cents));
            if !summary.budgets.is_empty() {
                println!("\nBudget utilization:");
                for usage in summary.budgets {
                    println!(
                        "  {:<7} {:<16} {:>12} of {:>12}  {:>5.1}%",
                        usage.period,
                        usage.category.label(),
                        format_cents(usage.spent_cents),
                        format_cents(usage.limit_cents),
                        usage.used_percent
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_contacts(db: &GroupDb, command: ContactsCommand) -> anyhow::Result<()> {
    match command {
        ContactsCommand::List => {
            let messages = db.get_contact_messages().await?;
            println!("=== Contact Messages ({}) ===", messages.len());
            for message in messages {
                println!(
                    "{:>14}  {:<24} {:<28} {:<8} {}",
                    message.id,
                    message.name,
                    message.email,
                    if message.handled { "handled" } else { "open" },
                    message.subject.unwrap_or_default()
                );
            }
        }
        ContactsCommand::MarkHandled { id } => {
            let message = db
                .get_contact_messages()
                .await?
                .into_iter()
                .find(|m| m.id == id)
                .with_context(|| format!("No contact message with id {id}"))?;
            db.set_contact_handled(&message, true).await?;
            println!("Marked message {id} as handled");
        }
        ContactsCommand::Remove { id } => {
            let message = db
                .get_contact_messages()
                .await?
                .into_iter()
                .find(|m| m.id == id)
                .with_context(|| format!("No contact message with id {id}"))?;
            db.delete_contact_message(message).await?;
            println!("Removed contact message {id}");
        }
    }
    Ok(())
}

async fn run_news(db: &GroupDb, command: NewsCommand) -> anyhow::Result<()> {
    match command {
        NewsCommand::List => {
            let posts = db.get_news().await?;
            println!("=== News ({}) ===", posts.len());
            for post in posts {
                println!(
                    "{:>14}  {:<10} {}",
                    post.id,
                    post.published_at.unwrap_or_default(),
                    post.title
                );
            }
        }
        NewsCommand::Publish { title, body, date } => {
            let published_at = match date {
                Some(date) => Some(date),
                None => Some(today_iso()?),
            };
            let post = db
                .add_news(&NewNewsPost {
                    title,
                    body,
                    published_at,
                })
                .await?;
            println!("Published \"{}\" (id {})", post.title, post.id);
        }
        NewsCommand::Remove { id } => {
            let post = db
                .get_news()
                .await?
                .into_iter()
                .find(|p| p.id == id)
                .with_context(|| format!("No news post with id {id}"))?;
            db.delete_news(post).await?;
            println!("Removed news post {id}");
        }
    }
    Ok(())
}

async fn run_documents(db: &GroupDb, command: DocumentsCommand) -> anyhow::Result<()> {
    match command {
        DocumentsCommand::List { category } => {
            let documents = match category {
                Some(category) => db.get_documents_in_category(category.parse()?).await?,
                None => db.get_documents().await?,
            };
            println!("=== Documents ({}) ===", documents.len());
            for document in documents {
                println!(
                    "{:>14}  {:<16} {:<32} {}",
                    document.id,
                    document.category.label(),
                    document.title,
                    document.url
                );
            }
        }
        DocumentsCommand::Add {
            title,
            category,
            url,
        } => {
            let document = db
                .add_document(&NewDocumentEntry {
                    title,
                    category: category.parse()?,
                    url,
                })
                .await?;
            println!("Added document \"{}\" (id {})", document.title, document.id);
        }
        DocumentsCommand::Remove { id } => {
            let document = db
                .get_documents()
                .await?
                .into_iter()
                .find(|d| d.id == id)
                .with_context(|| format!("No document with id {id}"))?;
            db.delete_document(document).await?;
            println!("Removed document {id}");
        }
    }
    Ok(())
}

async fn run_users(db: &GroupDb, command: UsersCommand, actor: &str) -> anyhow::Result<()> {
    match command {
        UsersCommand::List => {
            let users = db.get_users().await?;
            println!("=== Users ({}) ===", users.len());
            for user in users {
                println!(
                    "{:>14}  {:<20} {:<8} {}",
                    user.id,
                    user.username,
                    user.role,
                    if user.active { "active" } else { "disabled" }
                );
            }
        }
        UsersCommand::Add {
            username,
            password,
            role,
        } => {
            let user = db
                .add_user(
                    &NewSystemUser {
                        username,
                        password,
                        role: role.parse()?,
                        active: true,
                    },
                    actor,
                )
                .await?;
            println!("Added user \"{}\" ({})", user.username, user.role);
        }
        UsersCommand::SetRole { username, role } => {
            let user = db
                .get_user_by_username(&username)
                .await?
                .with_context(|| format!("No user named {username}"))?;
            let update = SystemUserUpdate {
                role: Some(role.parse()?),
                ..Default::default()
            };
            let user = db.update_user(&user, &update, actor).await?;
            println!("User \"{}\" is now {}", user.username, user.role);
        }
        UsersCommand::Deactivate { username } => {
            let user = db
                .get_user_by_username(&username)
                .await?
                .with_context(|| format!("No user named {username}"))?;
            let update = SystemUserUpdate {
                active: Some(false),
                ..Default::default()
            };
            db.update_user(&user, &update, actor).await?;
            println!("Deactivated user \"{username}\"");
        }
        UsersCommand::Remove { username } => {
            let user = db
                .get_user_by_username(&username)
                .await?
                .with_context(|| format!("No user named {username}"))?;
            db.delete_user(user, actor).await?;
            println!("Removed user \"{username}\"");
        }
    }
    Ok(())
}

/// Parses a decimal amount like `123.45` into integer cents.
fn parse_amount(s: &str) -> anyhow::Result<i64> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    let whole: i64 = whole
        .parse()
        .with_context(|| format!("Not an amount: {s}"))?;
    anyhow::ensure!(whole >= 0, "Amount must not be negative: {s}");
    let cents = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().with_context(|| format!("Not an amount: {s}"))? * 10,
        2 => frac.parse::<i64>().with_context(|| format!("Not an amount: {s}"))?,
        _ => anyhow::bail!("At most two decimal places: {s}"),
    };
    Ok(whole * 100 + cents)
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
