// Process-level I/O
pub mod lock; // Single-instance lock for the watch loop
