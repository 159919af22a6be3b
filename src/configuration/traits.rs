use miette::Result;

/// Raw settings as loaded from `keeper.toml` that can be validated
/// into their `Resolved` form, optionally using an already resolved `Context`
/// (e.g. base paths needed to expand placeholders).
pub trait ResolvableConfiguration<Context = ()> {
    type Resolved;

    /// Validate and convert. Returning `Err` means the configuration file
    /// contains a value the binary cannot work with.
    fn resolve(self, context: Context) -> Result<Self::Resolved>;
}
