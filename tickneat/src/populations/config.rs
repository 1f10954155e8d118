use crate::genomics::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0], which
/// is checked by [`validate`].
///
/// [`validate`]: PopulationConfig::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: NonZeroUsize,
    /// Genetic distance threshold, beyond which
    /// genomes are considered as belonging to
    /// different species.
    pub distance_threshold: f32,
    /// Number of generations without a fitness increase
    /// before a species is eliminated.
    pub stagnation_threshold: NonZeroUsize,
    /// Top % of each species which can participate
    /// in reproduction. At least one member of
    /// every species is always eligible.
    pub survival_threshold: f32,
    /// Species with more members than this
    /// carry their champion over to the next
    /// generation unchanged.
    pub champion_population_threshold: usize,
    /// Chance that offspring will be the result
    /// of sexual reproduction (as opposed to asexual).
    pub sexual_reproduction_chance: f32,
    /// Maximum number of species alive at once.
    pub max_species: usize,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of `NonZeroUsize`s, 1.
    /// The species capacity is unbounded.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use tickneat::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     survival_threshold: 0.5,
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::MIN,
            distance_threshold: 0.0,
            stagnation_threshold: NonZeroUsize::MIN,
            survival_threshold: 0.0,
            champion_population_threshold: 0,
            sexual_reproduction_chance: 0.0,
            max_species: usize::MAX,
        }
    }

    /// Checks that probabilities lie in [0.0, 1.0], that the
    /// distance threshold is finite and non-negative, and that
    /// at least one species may exist.
    ///
    /// # Errors
    /// Returns the first offending value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability("survival_threshold", self.survival_threshold)?;
        ConfigError::check_probability(
            "sexual_reproduction_chance",
            self.sexual_reproduction_chance,
        )?;
        ConfigError::check_magnitude("distance_threshold", self.distance_threshold)?;
        if self.max_species == 0 {
            return Err(ConfigError::NoSpeciesCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_json() {
        let config: PopulationConfig = serde_json::from_str(
            r#"{
                "size": 150,
                "distance_threshold": 3.0,
                "stagnation_threshold": 15,
                "survival_threshold": 0.5,
                "champion_population_threshold": 4,
                "sexual_reproduction_chance": 0.75,
                "max_species": 64
            }"#,
        )
        .unwrap();

        assert_eq!(config.size.get(), 150);
        assert_eq!(config.stagnation_threshold.get(), 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(PopulationConfig::zero().validate().is_ok());
        assert_eq!(
            PopulationConfig {
                max_species: 0,
                ..PopulationConfig::zero()
            }
            .validate(),
            Err(ConfigError::NoSpeciesCapacity)
        );
        assert!(matches!(
            PopulationConfig {
                survival_threshold: 1.5,
                ..PopulationConfig::zero()
            }
            .validate(),
            Err(ConfigError::InvalidProbability {
                name: "survival_threshold",
                ..
            })
        ));
        assert!(matches!(
            PopulationConfig {
                distance_threshold: f32::INFINITY,
                ..PopulationConfig::zero()
            }
            .validate(),
            Err(ConfigError::InvalidMagnitude { .. })
        ));
    }
}
