//! Inventory normalization
//!
//! Turns raw CloudStack listing payloads into typed collections and
//! applies name filtering. An absent collection key is a diagnostic, not
//! an error: listings legitimately come back empty under a wrong or
//! empty project scope, and the tool must keep going with an empty
//! collection rather than fail.
//!
//! # Module Structure
//!
//! - [`machines`] - display-name address index over `listVirtualMachines`
//! - [`networks`] - network records over `listNetworks`
//! - [`templates`] - OS template records over `listTemplates`

pub mod machines;
pub mod networks;
pub mod templates;

pub use machines::MachineAddressIndex;
pub use networks::NetworkRecord;
pub use templates::TemplateRecord;

/// Case-insensitive substring match shared by all name filters. A
/// missing filter keeps everything.
pub(crate) fn name_matches(name: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(f) => name.to_lowercase().contains(&f.to_lowercase()),
        None => true,
    }
}
