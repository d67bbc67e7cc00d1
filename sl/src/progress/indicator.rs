//! ProgressIndicator trait definition

/// Visual indicator shown for the duration of a delivery batch
///
/// Result lines are written through the indicator so they can be printed
/// without tearing the spinner.
pub trait ProgressIndicator: Send + Sync {
    /// Advance the animation by one frame
    fn tick(&self);

    /// Print one line of output above the indicator
    fn println(&self, line: &str);

    /// Remove the indicator; called once when the batch is done
    fn finish(&self);
}
