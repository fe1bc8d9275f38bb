/// Reads an optional environment variable.
///
/// Unset, non-unicode and blank values all read as `None`, so an exported but
/// empty `SMC_WEBHOOK_URL=` does not count as configured.
pub fn get_env_var_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
