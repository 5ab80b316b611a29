use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use terrain_deform::layers::{
    apply_directional_flow, apply_fractal_noise, apply_radial_ripple, apply_radius_smoothing, flow_delta,
    fractal_delta, ripple_delta, LayerContext,
};
use terrain_deform::synthetic::random_baseline;
use terrain_deform::{
    DeformConfig, DeformPreset, DeformationPipeline, GridExtentMapper, HeightGrid, PerlinSource, RippleParams,
    SmoothingParams, TerrainExtents,
};

fn within_span(out: f32, current: f32, delta: f32) -> bool {
    let (lo, hi) = if delta < 0.0 { (current + delta, current) } else { (current, current + delta) };
    out >= lo - 1e-6 && out <= hi + 1e-6
}

fn busy_config() -> DeformConfig {
    let mut config = DeformPreset::Dramatic.config();
    config.ripple.radius = 400.0;
    config.flow.direction = (0.3, -0.8);
    config.flow.animate = true;
    config.flow.animation_speed = 1.3;
    config.smoothing.radius = 300.0;
    config
}

#[test]
fn disabled_config_is_identity_for_any_baseline() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut pipeline = DeformationPipeline::new(TerrainExtents::default()).unwrap();
    for resolution in [1, 2, 3, 16, 65] {
        let baseline = random_baseline(resolution, &mut rng);
        pipeline.capture_baseline(&baseline);
        assert_eq!(pipeline.recompute(&DeformConfig::disabled()).unwrap(), baseline);
    }
}

#[test]
fn repeated_recompute_does_not_drift() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let baseline = random_baseline(48, &mut rng);
    let mut pipeline = DeformationPipeline::new(TerrainExtents::new(500.0, 50.0, 500.0).unwrap()).unwrap();
    pipeline.capture_baseline(&baseline);

    let config = busy_config();
    pipeline.advance(0.4, &config);

    let first = pipeline.recompute(&config).unwrap();
    let second = pipeline.recompute(&config).unwrap();
    assert_eq!(first, second);
    assert_eq!(pipeline.baseline(), Some(&baseline));
}

#[test]
fn reset_restores_baseline() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let baseline = random_baseline(32, &mut rng);
    let mut pipeline = DeformationPipeline::new(TerrainExtents::default()).unwrap();
    pipeline.capture_baseline(&baseline);

    let config = busy_config();
    for _ in 0..5 {
        pipeline.advance(0.1, &config);
        let out = pipeline.recompute(&config).unwrap();
        assert_ne!(out, baseline);
    }

    assert_eq!(pipeline.reset().unwrap(), baseline);
    assert_eq!(pipeline.recompute(&DeformConfig::disabled()).unwrap(), baseline);
}

#[test]
fn recompute_before_capture_reports_not_ready() {
    let pipeline = DeformationPipeline::new(TerrainExtents::default()).unwrap();
    match pipeline.recompute(&DeformConfig::default()) {
        Err(e) => {
            assert!(e.is_not_ready());
            assert!(!e.to_string().is_empty());
        }
        Ok(_) => panic!("recompute without a baseline must report not-ready"),
    }
}

#[test]
fn every_layer_stays_within_blend_span() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let current = random_baseline(40, &mut rng);
    let noise = PerlinSource::new(8);
    let ctx = LayerContext {
        mapper: GridExtentMapper::new(TerrainExtents::new(40.0, 5.0, 40.0).unwrap(), 40),
        noise: &noise,
        time: 0.37,
    };
    let config = busy_config();

    let mut out = current.clone();
    apply_radial_ripple(&mut out, &config.ripple, &ctx);
    for (x, y, h) in out.iter() {
        assert!(within_span(h, current.get(x, y), ripple_delta(&config.ripple, &ctx, x, y)));
    }

    let mut out = current.clone();
    apply_directional_flow(&mut out, &config.flow, &ctx);
    for (x, y, h) in out.iter() {
        assert!(within_span(h, current.get(x, y), flow_delta(&config.flow, &ctx, x, y)));
    }

    let mut out = current.clone();
    apply_fractal_noise(&mut out, &config.noise, &ctx);
    for (x, y, h) in out.iter() {
        assert!(within_span(h, current.get(x, y), fractal_delta(&config.noise, &ctx, x, y)));
    }

    // One smoothing pass moves each interior cell toward its 3×3 mean
    let smoothing = SmoothingParams { iterations: 1, ..config.smoothing.clone() };
    let mut out = current.clone();
    apply_radius_smoothing(&mut out, &smoothing, &ctx);
    for (x, y, h) in out.iter() {
        let interior = x > 0 && y > 0 && x + 1 < 40 && y + 1 < 40;
        if interior {
            let delta = current.box_average(x, y) - current.get(x, y);
            assert!(within_span(h, current.get(x, y), delta));
        } else {
            assert_eq!(h, current.get(x, y));
        }
    }
}

#[test]
fn high_octave_noise_recomputes() {
    let mut pipeline = DeformationPipeline::new(TerrainExtents::default()).unwrap();
    pipeline.capture_baseline(&HeightGrid::new_with(8, 0.5));

    let mut config = DeformConfig::disabled();
    config.noise.enabled = true;
    for octaves in [4, 64, 70, 100, 500] {
        config.noise.octaves = octaves;
        let out = pipeline.recompute(&config).unwrap();
        assert!(out.as_slice().iter().all(|h| h.is_finite()), "octaves {}", octaves);
    }
}

#[test]
fn ripple_scenario_through_pipeline() {
    let mut pipeline = DeformationPipeline::new(TerrainExtents::new(10.0, 1.0, 10.0).unwrap()).unwrap();
    pipeline.capture_baseline(&HeightGrid::new(3));

    let mut config = DeformConfig::disabled();
    config.ripple = RippleParams {
        enabled: true,
        center: (0.5, 0.5),
        radius: 5.0,
        count: 1,
        amplitude: 1.0,
        frequency: 1.0,
        noise_amount: 0.0,
        blend_strength: 1.0,
    };
    let out = pipeline.recompute(&config).unwrap();

    assert!(out.get(1, 1).abs() < 1e-6);
    for &(x, y) in &[(1, 0), (0, 1), (2, 1), (1, 2)] {
        assert!((out.get(x, y) - -0.0962).abs() < 1e-3);
    }
    let corner = out.get(0, 0);
    assert!(corner < 0.0 && corner > -0.002);
    for &(x, y) in &[(2, 0), (0, 2), (2, 2)] {
        assert!((out.get(x, y) - corner).abs() < 1e-7);
    }
}
