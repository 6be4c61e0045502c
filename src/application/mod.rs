/// Application layer - Use cases, DTOs and adapter factories
///
/// This layer contains the application logic that orchestrates
/// domain services and coordinates with infrastructure through ports.
pub mod dto;
pub mod factories;
pub mod use_cases;
