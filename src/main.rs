use clap::Parser;
use shopvault::cli::{Cli, Commands};
use shopvault::shops::validate_shop_domain;

fn main() {
    let cli = Cli::parse();

    // Validate the shop domain early to catch typos before any prompt.
    let domain_arg = match &cli.command {
        Commands::Set { shop, .. } | Commands::Get { shop } | Commands::Delete { shop, .. } => {
            Some(shop.clone())
        }
        _ => None,
    };
    if let Some(shop) = domain_arg {
        if let Err(e) = validate_shop_domain(&shop) {
            shopvault::cli::output::error(&e.to_string());
            std::process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Keygen => shopvault::cli::commands::keygen::execute(),
        Commands::Set {
            ref shop,
            ref token,
            ref scope,
        } => shopvault::cli::commands::set::execute(&cli, shop, token.as_deref(), scope.as_deref()),
        Commands::Get { ref shop } => shopvault::cli::commands::get::execute(&cli, shop),
        Commands::Shops => shopvault::cli::commands::shops::execute(&cli),
        Commands::Delete { ref shop, force } => {
            shopvault::cli::commands::delete::execute(&cli, shop, force)
        }
        Commands::Check => shopvault::cli::commands::check::execute(&cli),
        Commands::Audit { last } => shopvault::cli::commands::audit_cmd::execute(&cli, last),
    };

    if let Err(e) = result {
        shopvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
