use crate::auth::error::ServiceError;
use crate::auth::{Request, ScopeCreation, ScopeLookup, ScopeUpdate, Store};
use crate::config::{DatabaseSettings, ServiceSettings};
use crate::core::models::ScopeRecord;
use crate::core::types::ScopeIdentifier;
use crate::db::DbStore;
use crate::provider::{AuthorizationProvider, Error, Response};

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[clap(
    name = "kagi-util",
    version = env!("CARGO_PKG_VERSION"),
    about = "Maintenance tasks for the authorization service database"
)]
pub struct Options {
    #[clap(flatten)]
    pub service: ServiceSettings,
    #[clap(flatten)]
    pub database: DatabaseSettings,
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    /// Apply pending schema migrations
    Migrate,
    ListScopes,
    ShowScope(ScopeArgs),
    AddScope(AddScope),
    EditScope(EditScope),
    DeleteScope(ScopeArgs),
}

#[derive(Parser)]
struct ScopeArgs {
    /// Numeric id or scope value
    identifier: ScopeIdentifier,
}

#[derive(Parser)]
struct AddScope {
    #[clap(short, long)]
    name: String,
    #[clap(short, long)]
    value: String,
    #[clap(short, long, default_value = "")]
    description: String,
}

#[derive(Parser)]
struct EditScope {
    identifier: ScopeIdentifier,
    #[clap(short, long)]
    name: Option<String>,
    #[clap(short, long)]
    description: Option<String>,
}

fn print_scope(scope: &ScopeRecord) {
    println!(
        "{}\t{}\t{} (\"{}\")",
        scope.id, scope.value, scope.name, scope.description
    );
}

fn run_request<S: Store>(
    provider: &AuthorizationProvider<S>,
    request: Request,
) -> Result<(), Error> {
    request
        .check()
        .map_err(|e| ServiceError::MalformedRequest(e.to_string()))?;

    match provider.handle(request)? {
        Response::Scope(scope) => print_scope(&scope),
        Response::Introspection(result) => println!("{}", serde_json::to_string(&result)?),
    }
    Ok(())
}

pub fn run_cli_action(opts: Options) -> Result<(), Error> {
    use SubCommand::*;

    let store = DbStore::acquire(&opts.database.database_url, opts.database.pool_size)?;

    let provider = AuthorizationProvider::new(store);

    match opts.command {
        Migrate => provider.store().migrate(),
        ListScopes => {
            for scope in provider.store().list_scopes()? {
                print_scope(&scope);
            }
            Ok(())
        }
        ShowScope(c) => run_request(
            &provider,
            Request::CheckScope(ScopeLookup {
                scope_identifier: c.identifier,
            }),
        ),
        AddScope(c) => run_request(
            &provider,
            Request::AddScope(ScopeCreation {
                name: c.name,
                description: c.description,
                value: c.value,
            }),
        ),
        EditScope(c) => run_request(
            &provider,
            Request::EditScope(ScopeUpdate {
                scope_identifier: c.identifier,
                name: c.name,
                description: c.description,
            }),
        ),
        DeleteScope(c) => run_request(
            &provider,
            Request::DeleteScope(ScopeLookup {
                scope_identifier: c.identifier,
            }),
        ),
    }
}
