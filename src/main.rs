use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, bail};
use secrecy::SecretString;

use worknow_client::api::ApiClient;
use worknow_client::api::models::{ApplicationEntry, ApplicationStatus, Job, Project};
use worknow_client::config::ClientConfig;
use worknow_client::home::load_home;
use worknow_client::notifications::{NotificationManager, NotificationKind};
use worknow_client::profile::ProfileEditor;
use worknow_client::session::SessionStore;
use worknow_client::storage::{JsonFileStore, KeyValueStore};

const USAGE: &str = "\
Usage: worknow <command>

Commands:
  login <email> [--remember]       Log in (password from WORKNOW_PASSWORD or stdin)
  logout                           Forget the stored session
  whoami                           Show the logged-in user
  home                             Show the role-based home feed
  jobs [query]                     List or search jobs
  projects [query]                 List or search projects
  applications                     List project then job applications
  status <job|project> <id> <pending|accepted|rejected>
  profile                          Show your profile
  profile set <field> <value>...   Edit and save profile fields
";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprint!("{USAGE}");
        std::process::exit(2);
    };

    let config = ClientConfig::from_env()?;
    let storage: Arc<dyn KeyValueStore> = Arc::new(
        JsonFileStore::open(&config.session_path)
            .await
            .with_context(|| format!("opening session file {}", config.session_path.display()))?,
    );
    let session = SessionStore::new(storage);
    let client = ApiClient::new(&config, session.clone())?;
    let notifications = NotificationManager::with_default_duration(config.toast_duration);

    let result = run(command, &args[1..], &client, &session, &notifications).await;

    for toast in notifications.visible().await {
        let tag = match toast.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        };
        eprintln!("[{tag}] {}: {}", toast.title, toast.message);
    }

    result
}

async fn run(
    command: &str,
    args: &[String],
    client: &ApiClient,
    session: &SessionStore,
    notifications: &Arc<NotificationManager>,
) -> anyhow::Result<()> {
    match command {
        "login" => {
            let mut email = None;
            let mut remember = false;
            for arg in args {
                match arg.as_str() {
                    "--remember" => remember = true,
                    other => email = Some(other.to_string()),
                }
            }
            let email = match email {
                Some(e) => e,
                None => {
                    let remembered = session.remembered_email().await?;
                    if remembered.is_empty() {
                        bail!("login needs an email");
                    }
                    remembered
                }
            };
            let password = read_password()?;
            match client.login(&email, password, remember).await {
                Ok(user) => {
                    notifications
                        .success("Welcome back", format!("Logged in as {}", user.email))
                        .await;
                }
                Err(e) => {
                    notifications.error("Login failed", e.user_message()).await;
                    return Err(e.into());
                }
            }
        }
        "logout" => {
            client.logout().await?;
            notifications.info("Logged out", "Session cleared").await;
        }
        "whoami" => match session.current_user().await? {
            Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
            None => println!("not logged in"),
        },
        "home" => {
            let feed = load_home(client).await?;
            println!("{} ({})", feed.user.email, feed.role());
            println!("\nJobs:");
            print_jobs(&feed.jobs);
            println!("\nProjects:");
            print_projects(&feed.projects);
            println!(
                "\nApplications ({} pending):",
                feed.pending_applications()
            );
            print_applications(&feed.applications);
        }
        "jobs" => {
            let jobs = client.search_jobs(&args.join(" ")).await?;
            print_jobs(&jobs);
        }
        "projects" => {
            let projects = client.search_projects(&args.join(" ")).await?;
            print_projects(&projects);
        }
        "applications" => {
            let entries = client.all_applications().await?;
            print_applications(&entries);
        }
        "status" => {
            let [kind, id, status] = args else {
                bail!("usage: status <job|project> <id> <pending|accepted|rejected>");
            };
            let status: ApplicationStatus = status.parse().map_err(anyhow::Error::msg)?;
            match kind.as_str() {
                "job" => {
                    client.update_job_application_status(id, status).await?;
                }
                "project" => {
                    client.update_project_application_status(id, status).await?;
                }
                other => bail!("unknown application kind: {other}"),
            }
            notifications
                .success("Application updated", format!("{kind} application {id} is now {status}"))
                .await;
        }
        "profile" => {
            let mut editor =
                ProfileEditor::load_for_current_user(client.clone(), Arc::clone(notifications))
                    .await?;
            if args.first().map(String::as_str) == Some("set") {
                let pairs = &args[1..];
                if pairs.is_empty() || pairs.len() % 2 != 0 {
                    bail!("usage: profile set <field> <value> [<field> <value>...]");
                }
                editor.begin_edit()?;
                for pair in pairs.chunks(2) {
                    editor.set_field(pair[0].clone(), pair[1].clone())?;
                }
                editor.save().await?;
            }
            for (field, value) in editor.current().fields() {
                println!("{field:>16}: {value}");
            }
        }
        other => {
            eprint!("{USAGE}");
            bail!("unknown command: {other}");
        }
    }
    Ok(())
}

fn read_password() -> anyhow::Result<SecretString> {
    if let Ok(password) = std::env::var("WORKNOW_PASSWORD") {
        return Ok(SecretString::from(password));
    }
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end().to_string()))
}

fn print_jobs(jobs: &[Job]) {
    if jobs.is_empty() {
        println!("  (none)");
    }
    for job in jobs {
        let salary = job.salary.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
        println!("  {:<10} {:<40} {:<20} {}", job.id, job.title, job.company_name, salary);
    }
}

fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("  (none)");
    }
    for project in projects {
        let budget = project.budget.map(|b| b.to_string()).unwrap_or_else(|| "-".into());
        println!("  {:<10} {:<40} {:<20} {}", project.id, project.title, project.company_name, budget);
    }
}

fn print_applications(entries: &[ApplicationEntry]) {
    if entries.is_empty() {
        println!("  (none)");
    }
    for entry in entries {
        let source = match entry {
            ApplicationEntry::Project(_) => "project",
            ApplicationEntry::Job(_) => "job",
        };
        println!(
            "  {:<8} {:<10} {:<30} {:<20} {}",
            source,
            entry.id(),
            entry.target_title(),
            entry.applicant_name(),
            entry.status()
        );
    }
}
