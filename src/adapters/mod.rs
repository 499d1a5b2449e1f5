// Adapters layer: the input file reader and the Falcon API client.

pub mod csv_source;
pub mod falcon;
pub mod uninstall_script;
