//! Runtime configuration.

use std::{env, fmt, str};

/// Environment variable read by [`Config::from_env`].
///
/// [`Config::from_env`]: struct.Config.html#method.from_env
pub const ERROR_POLICY_VAR: &str = "GLWRAP_ERROR_POLICY";

/// What a [`Context`] does once a driver error has been logged.
///
/// [`Context`]: ../context/struct.Context.html
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorPolicy {
    /// Abort the current thread by panicking.
    Panic,

    /// Return the error to the caller and carry on.
    Log,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ErrorPolicy::Panic
        } else {
            ErrorPolicy::Log
        }
    }
}

/// Returned when parsing an unknown [`ErrorPolicy`].
///
/// [`ErrorPolicy`]: enum.ErrorPolicy.html
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsePolicyError(String);

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown error policy {:?}, expected \"panic\" or \"log\"", self.0)
    }
}

impl std::error::Error for ParsePolicyError {}

impl str::FromStr for ErrorPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "panic" => Ok(ErrorPolicy::Panic),
            "log" => Ok(ErrorPolicy::Log),
            _ => Err(ParsePolicyError(s.to_owned())),
        }
    }
}

/// Context configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Behaviour on driver errors.
    pub error_policy: ErrorPolicy,

    /// Color written by `Renderer::clear`.
    pub clear_color: [f32; 4],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::default(),
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl Config {
    /// Default configuration with the error policy overridden by
    /// `GLWRAP_ERROR_POLICY` when set.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(value) = env::var(ERROR_POLICY_VAR) {
            match value.parse() {
                Ok(policy) => config.error_policy = policy,
                Err(err) => warn!("{}: {}", ERROR_POLICY_VAR, err),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Panic".parse::<ErrorPolicy>(), Ok(ErrorPolicy::Panic));
        assert_eq!(" log ".parse::<ErrorPolicy>(), Ok(ErrorPolicy::Log));
        assert!("abort".parse::<ErrorPolicy>().is_err());
    }

    #[test]
    fn default_clears_to_transparent_black() {
        assert_eq!(Config::default().clear_color, [0.0; 4]);
    }

    #[test]
    fn environment_overrides_the_policy() {
        let saved = env::var_os(ERROR_POLICY_VAR);
        env::set_var(ERROR_POLICY_VAR, "log");
        assert_eq!(Config::from_env().error_policy, ErrorPolicy::Log);
        env::set_var(ERROR_POLICY_VAR, "abort");
        assert_eq!(Config::from_env().error_policy, ErrorPolicy::default());
        match saved {
            Some(value) => env::set_var(ERROR_POLICY_VAR, value),
            None => env::remove_var(ERROR_POLICY_VAR),
        }
    }
}
