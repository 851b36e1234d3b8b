pub mod join;
pub mod run;
pub mod write;

/// Represents a command in the Spindle application.
pub trait Command {
    /// Consumes a command object and executes the handler actions
    /// associated with it.
    ///
    /// On failure, an error will be reported.
    fn handle(self) -> eyre::Result<()>;
}
