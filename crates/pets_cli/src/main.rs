//! Command-line front end for the pets store.
//!
//! # Responsibility
//! - Translate subcommands into `PetProvider` calls.
//! - Print rows as JSON lines and report failures with context.
//!
//! # Invariants
//! - Every read and write goes through the provider; no SQL lives here.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use pets_core::model::pet::{COLUMN_BREED, COLUMN_GENDER, COLUMN_NAME, COLUMN_WEIGHT};
use pets_core::{
    collection_uri, default_log_level, init_logging, item_uri, ContentUri, DbResult, Gender,
    Pet, PetValues, SchemaManager, Selection, SortOrder, SqlitePetProvider,
};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "pets", version, about = "Manage the local pets store")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "PETS_DB", default_value = "pets.sqlite3")]
    db: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long, env = "PETS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files; logging stays off when unset.
    #[arg(long, env = "PETS_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List pets, optionally filtered and sorted.
    List {
        #[arg(long)]
        breed: Option<String>,
        #[arg(long, value_parser = parse_gender)]
        gender: Option<Gender>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Show one pet.
    Show { id: i64 },
    /// Add a pet.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        breed: Option<String>,
        #[arg(long, value_parser = parse_gender, default_value = "unknown")]
        gender: Gender,
        #[arg(long, allow_hyphen_values = true)]
        weight: Option<i64>,
    },
    /// Change some fields of one pet.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        breed: Option<String>,
        #[arg(long, value_parser = parse_gender)]
        gender: Option<Gender>,
        #[arg(long, allow_hyphen_values = true)]
        weight: Option<i64>,
    },
    /// Delete one pet.
    Delete { id: i64 },
    /// Delete every pet.
    DeleteAll,
    /// Insert a sample pet.
    Seed,
    /// Print the resource type tag of an address.
    Type { uri: String },
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    Gender::parse_label(value).ok_or_else(|| {
        format!("unknown gender `{value}`; expected unknown|male|female")
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let log_dir = absolute(log_dir)?;
        init_logging(log_level(&cli), &log_dir.to_string_lossy())
            .context("failed to start logging")?;
    }

    let store = SchemaManager::open(&cli.db)
        .with_context(|| format!("failed to open pets database `{}`", cli.db.display()))?;
    info!("event=cli_command module=cli status=start");

    let result = {
        let provider = SqlitePetProvider::from_store(&store);
        let mut stdout = std::io::stdout().lock();
        execute(&provider, cli.command, &mut stdout)
    };

    finish(result, store.close())
}

fn log_level(cli: &Cli) -> &str {
    cli.log_level.as_deref().unwrap_or(default_log_level())
}

/// A command failure wins over a close failure, which is then only logged.
fn finish(result: Result<()>, closed: DbResult<()>) -> Result<()> {
    match (result, closed) {
        (Ok(()), closed) => closed.context("failed to close pets database"),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            error!("event=db_close module=cli status=error error={close_err}");
            Err(err)
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}

fn execute(
    provider: &SqlitePetProvider<'_>,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::List {
            breed,
            gender,
            sort,
            desc,
        } => {
            let mut selection = Selection::new();
            if let Some(breed) = breed {
                selection = selection.and_eq(COLUMN_BREED, breed);
            }
            if let Some(gender) = gender {
                selection = selection.and_eq(COLUMN_GENDER, gender.as_i64());
            }
            let order = sort.map(|column| {
                if desc {
                    SortOrder::desc(column)
                } else {
                    SortOrder::asc(column)
                }
            });
            let pets = provider
                .query(&collection_uri(), &[], Some(&selection), order.as_ref())
                .context("failed to list pets")?
                .to_pets()?;
            write_pets(&pets, out)
        }
        Command::Show { id } => {
            let pets = provider
                .query(&item_uri(id), &[], None, None)
                .with_context(|| format!("failed to load pet {id}"))?
                .to_pets()?;
            if pets.is_empty() {
                bail!("no pet with id {id}");
            }
            write_pets(&pets, out)
        }
        Command::Add {
            name,
            breed,
            gender,
            weight,
        } => {
            let mut values = PetValues::new()
                .with_text(COLUMN_NAME, name)
                .with_int(COLUMN_GENDER, gender.as_i64());
            if let Some(breed) = breed {
                values.put_text(COLUMN_BREED, breed);
            }
            if let Some(weight) = weight {
                values.put_int(COLUMN_WEIGHT, weight);
            }
            let uri = provider
                .insert(&collection_uri(), &values)
                .context("failed to add pet")?;
            writeln!(out, "{uri}")?;
            Ok(())
        }
        Command::Update {
            id,
            name,
            breed,
            gender,
            weight,
        } => {
            let mut values = PetValues::new();
            if let Some(name) = name {
                values.put_text(COLUMN_NAME, name);
            }
            if let Some(breed) = breed {
                values.put_text(COLUMN_BREED, breed);
            }
            if let Some(gender) = gender {
                values.put_int(COLUMN_GENDER, gender.as_i64());
            }
            if let Some(weight) = weight {
                values.put_int(COLUMN_WEIGHT, weight);
            }
            let changed = provider
                .update(&item_uri(id), &values, None)
                .with_context(|| format!("failed to update pet {id}"))?;
            writeln!(out, "updated {changed} pet(s)")?;
            Ok(())
        }
        Command::Delete { id } => {
            let changed = provider
                .delete(&item_uri(id), None)
                .with_context(|| format!("failed to delete pet {id}"))?;
            writeln!(out, "deleted {changed} pet(s)")?;
            Ok(())
        }
        Command::DeleteAll => {
            let changed = provider
                .delete(&collection_uri(), None)
                .context("failed to delete pets")?;
            writeln!(out, "deleted {changed} pet(s)")?;
            Ok(())
        }
        Command::Seed => {
            let values = PetValues::new()
                .with_text(COLUMN_NAME, "Toto")
                .with_text(COLUMN_BREED, "Terrier")
                .with_int(COLUMN_GENDER, Gender::MALE)
                .with_int(COLUMN_WEIGHT, 7);
            let uri = provider
                .insert(&collection_uri(), &values)
                .context("failed to insert sample pet")?;
            writeln!(out, "{uri}")?;
            Ok(())
        }
        Command::Type { uri } => {
            let tag = provider.get_type(&ContentUri::parse(&uri))?;
            writeln!(out, "{tag}")?;
            Ok(())
        }
    }
}

fn write_pets(pets: &[Pet], out: &mut impl Write) -> Result<()> {
    for pet in pets {
        writeln!(out, "{}", serde_json::to_string(pet)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{execute, finish, log_level, Cli, Command};
    use anyhow::anyhow;
    use clap::Parser;
    use pets_core::{default_log_level, DbError, Gender, SchemaManager, SqlitePetProvider};

    fn run(provider: &SqlitePetProvider<'_>, args: &[&str]) -> anyhow::Result<String> {
        let mut argv = vec!["pets"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        execute(provider, cli.command, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn parses_add_with_gender_label() {
        let cli = Cli::try_parse_from([
            "pets", "--db", "/tmp/x.db", "add", "--name", "Rex", "--gender", "male",
        ])
        .unwrap();
        match cli.command {
            Command::Add { name, gender, .. } => {
                assert_eq!(name, "Rex");
                assert_eq!(gender, Gender::Male);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_level_prefers_flag_over_build_default() {
        let cli = Cli::try_parse_from(["pets", "--log-level", "warn", "list"]).unwrap();
        assert_eq!(log_level(&cli), "warn");

        let cli = Cli::try_parse_from(["pets", "list"]).unwrap();
        if cli.log_level.is_none() {
            assert_eq!(log_level(&cli), default_log_level());
        }
    }

    #[test]
    fn command_error_is_kept_when_close_also_fails() {
        let closed = Err(DbError::UnsupportedSchemaVersion {
            db_version: 2,
            latest_supported: 1,
        });
        let err = finish(Err(anyhow!("no pet with id 7")), closed).unwrap_err();
        assert_eq!(err.to_string(), "no pet with id 7");
    }

    #[test]
    fn close_error_is_reported_after_successful_command() {
        let closed = Err(DbError::UnsupportedSchemaVersion {
            db_version: 2,
            latest_supported: 1,
        });
        let err = finish(Ok(()), closed).unwrap_err();
        assert_eq!(err.to_string(), "failed to close pets database");
        assert!(finish(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn rejects_unknown_gender_label() {
        assert!(Cli::try_parse_from(["pets", "add", "--name", "Rex", "--gender", "cat"]).is_err());
    }

    #[test]
    fn seed_list_update_delete_flow() {
        let store = SchemaManager::open_in_memory().unwrap();
        let provider = SqlitePetProvider::from_store(&store);

        assert_eq!(
            run(&provider, &["seed"]).unwrap(),
            "content://com.example.pets/pets/1\n"
        );
        assert_eq!(
            run(&provider, &["show", "1"]).unwrap(),
            "{\"id\":1,\"name\":\"Toto\",\"breed\":\"Terrier\",\"gender\":1,\"weight\":7}\n"
        );
        assert_eq!(
            run(&provider, &["update", "1", "--weight", "9"]).unwrap(),
            "updated 1 pet(s)\n"
        );
        assert!(run(&provider, &["list", "--breed", "Terrier"])
            .unwrap()
            .contains("\"weight\":9"));
        assert_eq!(
            run(&provider, &["delete-all"]).unwrap(),
            "deleted 1 pet(s)\n"
        );
        assert!(run(&provider, &["show", "1"]).is_err());
    }

    #[test]
    fn add_surfaces_validation_errors() {
        let store = SchemaManager::open_in_memory().unwrap();
        let provider = SqlitePetProvider::from_store(&store);

        let err = run(&provider, &["add", "--name", "Rex", "--weight", "-1"]).unwrap_err();
        assert!(format!("{err:#}").contains("out of range"), "{err:#}");
    }

    #[test]
    fn type_prints_tag_or_fails() {
        let store = SchemaManager::open_in_memory().unwrap();
        let provider = SqlitePetProvider::from_store(&store);

        assert!(run(&provider, &["type", "content://com.example.pets/pets/3"])
            .unwrap()
            .starts_with("vnd.pets.cursor.item/"));
        assert!(run(&provider, &["type", "content://com.example.pets/staff"]).is_err());
    }
}
