/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports (driven ports) describe the infrastructure the application
/// core depends on: archives, registries, VCS hosts, license detection and output.
pub mod outbound;
