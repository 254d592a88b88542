// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Run configuration: the numeric constants and oracle choice threaded by
//! reference through a single run of the solver.

/// Which form-factor oracle builds the transfer matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Oracle {
    /// The exact closed-form solution; only practical for convex,
    /// unoccluded scenes, since it has no notion of visibility blocking.
    Analytic,
    /// The hemicube rasteriser; the physically faithful choice for
    /// scenes with occluders.
    Raster,
}

impl Default for Oracle {
    fn default() -> Self {
        Oracle::Raster
    }
}

/// The full set of tunables for one solver run. Defaults reproduce the
/// reference scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Grid subdivisions per base cube face.
    pub subdivision: u32,
    /// Relative scene-luminance change at which the Jacobi loop declares
    /// convergence.
    pub convergence_target: f64,
    /// Hemicube face resolution in pixels, used only by [`Oracle::Raster`].
    pub resolution: u32,
    /// Target brightness for normalisation.
    pub target_brightness: f64,
    /// Which oracle builds the transfer matrix.
    pub oracle: Oracle,
    /// Hard cap on Jacobi iterations before [`crate::error::RadiosityError::NotConverged`].
    pub iteration_cap: u32,
    /// Where the driver writes the final PNG.
    pub output_path: std::path::PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            subdivision: 32,
            convergence_target: 0.001,
            resolution: 256,
            target_brightness: 1.0,
            oracle: Oracle::default(),
            iteration_cap: 1000,
            output_path: std::path::PathBuf::from("png/scene.png"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_scenario() {
        let config = RunConfig::default();
        assert_eq!(config.subdivision, 32);
        assert_eq!(config.convergence_target, 0.001);
        assert_eq!(config.resolution, 256);
        assert_eq!(config.target_brightness, 1.0);
        assert_eq!(config.oracle, Oracle::Raster);
        assert_eq!(config.output_path, std::path::PathBuf::from("png/scene.png"));
    }
}
