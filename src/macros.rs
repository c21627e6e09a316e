//! Macros for ergonomic event invocation.

/// Build an [`Args`](crate::Args) pack in place, borrowing each value.
///
/// Values are borrowed, not moved, so locals stay usable after the call.
/// Use the pack directly in the invocation expression; it must not outlive
/// the values it borrows.
///
/// # Example
///
/// ```rust
/// use statehood::args;
///
/// let reason = String::from("maintenance");
/// let pack = args![reason, 2_u32];
///
/// assert_eq!(pack.len(), 2);
/// assert_eq!(pack.get::<u32>(1), Some(&2));
/// assert_eq!(reason, "maintenance");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::none()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::new(vec![$(&$value as &dyn ::std::any::Any),+])
    };
}
