//! Command dispatch and handlers
//!
//! A fixed table maps command names to handlers. Resolution returns a
//! typed result so an unknown command is handled explicitly by the
//! caller instead of unwinding through the stack. Handlers write result
//! rows to stdout only; diagnostics, usage lines and errors all go to
//! stderr so piped stdout stays machine-parseable.

use crate::api::CloudStackClient;
use crate::error::{Error, Result};
use crate::inventory::{machines, networks, templates};
use clap::error::ErrorKind;
use clap::Parser;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Everything a handler needs for one invocation
pub struct CommandContext<'a> {
    pub client: &'a CloudStackClient,
    pub args: &'a [String],
}

/// The available commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ListMachines,
    ListNetworks,
    ListOsTemplates,
    GetMachinesIps,
    GetNetworkInfo,
    GenerateTemplate,
}

fn table() -> &'static BTreeMap<&'static str, Command> {
    static TABLE: OnceLock<BTreeMap<&'static str, Command>> = OnceLock::new();
    TABLE.get_or_init(|| {
        BTreeMap::from([
            ("list-machines", Command::ListMachines),
            ("list-networks", Command::ListNetworks),
            ("list-os-templates", Command::ListOsTemplates),
            ("get-machines-ips", Command::GetMachinesIps),
            ("get-network-info", Command::GetNetworkInfo),
            ("generate-template", Command::GenerateTemplate),
        ])
    })
}

/// Resolve a command name. `None` means the caller should print the
/// command list and exit with a usage error.
pub fn resolve(name: &str) -> Option<Command> {
    table().get(name).copied()
}

/// All known command names
pub fn command_names() -> impl Iterator<Item = &'static str> {
    table().keys().copied()
}

impl Command {
    pub async fn run(self, ctx: &CommandContext<'_>) -> Result<()> {
        match self {
            Command::ListMachines => list_machines(ctx).await,
            Command::ListNetworks => list_networks(ctx).await,
            Command::ListOsTemplates => list_os_templates(ctx).await,
            Command::GetMachinesIps => get_machines_ips(ctx).await,
            Command::GetNetworkInfo => get_network_info(ctx).await,
            Command::GenerateTemplate => generate_template(ctx).await,
        }
    }
}

async fn list_machines(ctx: &CommandContext<'_>) -> Result<()> {
    let response = ctx.client.execute("listVirtualMachines", &[], false).await?;
    let index = machines::build_index(&response)?;

    for (name, _addresses) in index.iter() {
        println!("{}", name);
    }
    Ok(())
}

async fn list_networks(ctx: &CommandContext<'_>) -> Result<()> {
    let response = ctx.client.execute("listNetworks", &[], false).await?;

    for record in networks::list(&response, None) {
        println!("{:50} {}", record.name, record.cidr);
    }
    Ok(())
}

async fn list_os_templates(ctx: &CommandContext<'_>) -> Result<()> {
    let response = ctx
        .client
        .execute("listTemplates", &[("templatefilter", "self")], false)
        .await?;

    let mut rows = templates::list(&response, None);
    rows.sort_by(|a, b| a.display_text.cmp(&b.display_text));

    println!(
        "{:35} {:35} {:36} {:36}",
        "Template Description", "OS Type", "Template ID", "Zone Name"
    );
    for t in &rows {
        println!(
            "{:35} {:35} {:36} {:36}",
            t.display_text, t.os_type_name, t.id, t.zone_name
        );
    }
    Ok(())
}

async fn get_machines_ips(ctx: &CommandContext<'_>) -> Result<()> {
    let name = ctx.args.first().ok_or_else(|| Error::MissingArgument {
        usage: "csinv get-machines-ips <machine_name> [-o]".to_string(),
        message: "Missing machine name".to_string(),
    })?;

    let response = ctx.client.execute("listVirtualMachines", &[], false).await?;
    let index = machines::build_index(&response)?;

    let Some(addresses) = index.addresses(name) else {
        return Err(Error::NotFound);
    };

    if ctx.args.iter().any(|a| a == "-o") {
        // An existing key always carries at least one address.
        if let Some(first) = addresses.first() {
            println!("{}", first);
        }
    } else {
        println!("{}", addresses.join(" "));
    }
    Ok(())
}

async fn get_network_info(ctx: &CommandContext<'_>) -> Result<()> {
    let name = ctx.args.first().ok_or_else(|| Error::MissingArgument {
        usage: "csinv get-network-info <network_name>".to_string(),
        message: "Missing network name".to_string(),
    })?;

    let response = ctx.client.execute("listNetworks", &[], false).await?;

    println!(
        "{:50} {:18} {:36} {:36}",
        "Network Name", "CIDR", "Network ID", "Zone Name"
    );
    for record in networks::list(&response, Some(name)) {
        println!(
            "{:50} {:18} {:36} {:36}",
            record.name, record.cidr, record.id, record.zone_name
        );
    }
    Ok(())
}

/// Arguments of the deployment-template stub
#[derive(Parser, Debug)]
#[command(name = "generate-template")]
struct GenerateTemplateArgs {
    /// OS template id
    #[arg(short, long)]
    template: String,

    /// Network name prefix
    #[arg(short, long)]
    network: String,

    /// Service offering machine name
    #[arg(short = 'o', long)]
    service_offering: String,

    /// Disk offering id
    #[arg(short, long)]
    disk_offering: Option<String>,

    /// Disk offering size, for custom disk sizes
    #[arg(short = 's', long)]
    disk_offering_size: Option<String>,
}

/// Deployment template generation is not wired up yet; the stub only
/// validates its arguments.
async fn generate_template(ctx: &CommandContext<'_>) -> Result<()> {
    let mut argv = vec!["generate-template".to_string()];
    argv.extend_from_slice(ctx.args);

    let parsed = match GenerateTemplateArgs::try_parse_from(&argv) {
        Ok(parsed) => parsed,
        // -h/-V are a success, not a usage error.
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            print!("{}", e.render());
            return Ok(());
        }
        Err(e) => {
            let message = e
                .to_string()
                .lines()
                .next()
                .unwrap_or("invalid arguments")
                .to_string();
            return Err(Error::MissingArgument {
                usage: "csinv generate-template -t <template_id> -n <network_prefix> \
                        -o <service_offering> [-d <disk_offering_id>] [-s <disk_size>]"
                    .to_string(),
                message,
            });
        }
    };

    tracing::debug!(?parsed, "generate-template arguments accepted");
    Ok(())
}
