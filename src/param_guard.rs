/// A set of hyperparameters whose values have not been checked for validity.
///
/// A reference to the checked hyperparameters can only be obtained after
/// checking has completed. The validation done in `check_ref()` and `check()`
/// is identical.
pub trait ParamGuard {
    /// The checked hyperparameters
    type Checked;
    /// Error returned when checking fails
    type Error: std::error::Error;

    /// Checks the hyperparameters and returns a reference to them if successful
    fn check_ref(&self) -> Result<&Self::Checked, Self::Error>;

    /// Checks the hyperparameters and returns them if successful
    fn check(self) -> Result<Self::Checked, Self::Error>;

    /// Calls `check()` and unwraps the result
    fn check_unwrap(self) -> Self::Checked
    where
        Self: Sized,
    {
        self.check().unwrap()
    }
}
