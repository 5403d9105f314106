//! Store configuration.
//!
//! # Environment Variables
//!
//! All optional:
//! - `BRIGHTCART_CART_CAPACITY` - Initial bucket count of the cart table (default: 101)
//! - `BRIGHTCART_CART_LOAD_FACTOR` - Rehash threshold as entries per bucket (default: 0.75)
//! - `BRIGHTCART_FEATURED_WINDOW` - Carousel slots reserved for featured products (default: 3)
//! - `BRIGHTCART_PROMOTION_POLICY` - `rotate` or `splice` (default: rotate)

use thiserror::Error;

use crate::customers::PromotionPolicy;

/// Default bucket count of the cart hash table.
pub const DEFAULT_CART_CAPACITY: usize = 101;

/// Default load factor of the cart hash table.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Default number of front carousel slots reserved for featured products.
pub const DEFAULT_FEATURED_WINDOW: usize = 3;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Tunables for a [`Storefront`](crate::Storefront) and its components.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Initial bucket count of the cart's hash table
    pub cart_capacity: usize,
    /// Entries-per-bucket ratio that triggers a rehash
    pub cart_load_factor: f32,
    /// Front carousel slots reserved for featured products
    pub featured_window: usize,
    /// How `promote` moves a customer toward the root
    pub promotion_policy: PromotionPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cart_capacity: DEFAULT_CART_CAPACITY,
            cart_load_factor: DEFAULT_LOAD_FACTOR,
            featured_window: DEFAULT_FEATURED_WINDOW,
            promotion_policy: PromotionPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or if the
    /// resulting configuration fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("BRIGHTCART_CART_CAPACITY") {
            config.cart_capacity = parse_var("BRIGHTCART_CART_CAPACITY", &raw)?;
        }
        if let Some(raw) = lookup("BRIGHTCART_CART_LOAD_FACTOR") {
            config.cart_load_factor = parse_var("BRIGHTCART_CART_LOAD_FACTOR", &raw)?;
        }
        if let Some(raw) = lookup("BRIGHTCART_FEATURED_WINDOW") {
            config.featured_window = parse_var("BRIGHTCART_FEATURED_WINDOW", &raw)?;
        }
        if let Some(raw) = lookup("BRIGHTCART_PROMOTION_POLICY") {
            config.promotion_policy = raw.parse().map_err(|_| {
                ConfigError::InvalidEnvVar(
                    "BRIGHTCART_PROMOTION_POLICY".to_string(),
                    format!("expected `rotate` or `splice`, got `{raw}`"),
                )
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the components cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cart_capacity == 0 {
            return Err(ConfigError::Invalid("cart capacity must be at least 1"));
        }
        if !(self.cart_load_factor.is_finite() && self.cart_load_factor > 0.0) {
            return Err(ConfigError::Invalid("cart load factor must be positive"));
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.cart_capacity, 101);
        assert_eq!(config.featured_window, 3);
        assert_eq!(config.promotion_policy, PromotionPolicy::Rotate);
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("BRIGHTCART_CART_CAPACITY", "17"),
            ("BRIGHTCART_CART_LOAD_FACTOR", "0.5"),
            ("BRIGHTCART_FEATURED_WINDOW", "2"),
            ("BRIGHTCART_PROMOTION_POLICY", "splice"),
        ]))
        .unwrap();

        assert_eq!(config.cart_capacity, 17);
        assert_eq!(config.cart_load_factor, 0.5);
        assert_eq!(config.featured_window, 2);
        assert_eq!(config.promotion_policy, PromotionPolicy::Splice);
    }

    #[test]
    fn test_invalid_values() {
        let err = StoreConfig::from_lookup(lookup_from(&[("BRIGHTCART_CART_CAPACITY", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "BRIGHTCART_CART_CAPACITY"));

        let err = StoreConfig::from_lookup(lookup_from(&[("BRIGHTCART_CART_CAPACITY", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err =
            StoreConfig::from_lookup(lookup_from(&[("BRIGHTCART_CART_LOAD_FACTOR", "-1")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err =
            StoreConfig::from_lookup(lookup_from(&[("BRIGHTCART_PROMOTION_POLICY", "avl")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }
}
