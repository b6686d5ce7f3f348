//! Configurations shared by the examples.
use anonrl_env::{
    mock, Action, BinningConfig, DistanceType, DistortionEnvConfig, TilingConfig,
    TransformMethod,
};

/// Number of distortion bins of [`mock_env_config`].
pub const N_BINS: usize = 10;

/// Environment anonymizing the mock-subjects dataset by suppressing gender,
/// generalizing ethnicity and coarsening salary.
pub fn mock_env_config(distance_type: DistanceType, max_steps: usize) -> DistortionEnvConfig {
    DistortionEnvConfig::default()
        .dataset(mock::mock_subjects())
        .actions(vec![
            mock::gender_suppression(),
            mock::ethnicity_generalization(),
            Action::transform(
                "salary",
                TransformMethod::Coarsen {
                    width: 1000.0,
                    max_width: None,
                },
                3,
            ),
            Action::identity("education"),
        ])
        .start_column("gender")
        .binning(BinningConfig::FixedWidth {
            n_bins: N_BINS,
            upper: Some(3.0),
        })
        .max_steps(Some(max_steps))
        .distance_type(distance_type)
}

/// Tile coding of the total distortion and of the distortion of the
/// columns touched by [`mock_env_config`].
pub fn mock_tiling() -> TilingConfig {
    TilingConfig::default()
        .num_tilings(8)
        .tiling_dim(8)
        .max_size(4096)
        .column_scale("total_distortion", 2.0)
        .column_scale("gender", 4.0)
        .column_scale("ethnicity", 4.0)
        .column_scale("salary", 4.0)
}
