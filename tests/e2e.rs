mod common;

use common::synthetic_image::{
    filled_ball_stack, filled_disk_u8, paint_disk, spoked_arbor_u8,
};
use sholl_analysis::descriptors::PreferredMethod;
use sholl_analysis::image::ImageU8;
use sholl_analysis::{
    CancelToken, DescriptorParams, Monitor, PointI3, ShollAnalyzer, ShollParams, ShollSampler,
    ThresholdBand,
};

fn disk_params(size: usize) -> ShollParams {
    let mut params = ShollParams::for_image(PointI3::new(50, 50, 0), size, size);
    params.threshold = ThresholdBand::new(1.0, 1.0);
    params.start_radius = 5.0;
    params.end_radius = 25.0;
    params.step_radius = 5.0;
    params
}

#[test]
fn filled_disk_yields_one_crossing_inside_and_none_outside() {
    let buffer = filled_disk_u8(100, 100, 50, 50, 20, 1);
    let image = ImageU8 {
        w: 100,
        h: 100,
        stride: 100,
        data: &buffer,
    };

    let sampler = ShollSampler::new(disk_params(100)).unwrap();
    let profile = sampler.sample_2d(&image);
    assert_eq!(profile.radii(), vec![5.0, 10.0, 15.0, 20.0, 25.0]);
    assert_eq!(profile.counts(), vec![1.0, 1.0, 1.0, 1.0, 0.0]);

    // The zero sample at radius 25 is dropped before descriptor computation.
    let filtered = profile.non_zero();
    assert_eq!(filtered.len(), 4);
    assert_eq!(filtered.counts(), vec![1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn two_disjoint_disks_count_as_two_crossings() {
    let mut buffer = vec![0u8; 40 * 40];
    paint_disk(&mut buffer, 40, 10, 10, 3, 1);
    paint_disk(&mut buffer, 40, 10, 30, 3, 1);
    let image = ImageU8 {
        w: 40,
        h: 40,
        stride: 40,
        data: &buffer,
    };

    let mut params = ShollParams::for_image(PointI3::new(10, 20, 0), 40, 40);
    params.threshold = ThresholdBand::new(1.0, 1.0);
    params.start_radius = 5.0;
    params.end_radius = 10.0;
    params.step_radius = 5.0;

    let sampler = ShollSampler::new(params).unwrap();
    let profile = sampler.sample_2d(&image);
    // Radius 5 misses both disks; radius 10 crosses each of them once.
    assert_eq!(profile.counts(), vec![0.0, 2.0]);
}

#[test]
fn cancellation_mid_run_keeps_the_partial_profile() {
    let buffer = filled_disk_u8(100, 100, 50, 50, 20, 1);
    let image = ImageU8 {
        w: 100,
        h: 100,
        stride: 100,
        data: &buffer,
    };
    let sampler = ShollSampler::new(disk_params(100)).unwrap();

    let token = CancelToken::new();
    let trigger = token.clone();
    let mut cancel_after_first = |_current: usize, _total: usize| trigger.cancel();
    let mut monitor = Monitor {
        cancel: Some(&token),
        progress: Some(&mut cancel_after_first),
    };
    let profile = sampler.sample_2d_monitored(&image, &mut monitor);
    // The first radius was sampled before the token flipped; the remaining
    // entries keep their default zero.
    assert_eq!(profile.counts(), vec![1.0, 0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn spoked_arbor_report_has_full_descriptor_set() {
    let buffer = spoked_arbor_u8(100, 100, 50, 50, 25, 255);
    let image = ImageU8 {
        w: 100,
        h: 100,
        stride: 100,
        data: &buffer,
    };

    let mut params = ShollParams::for_image(PointI3::new(50, 50, 0), 100, 100);
    params.start_radius = 4.0;
    params.end_radius = 18.0;
    params.step_radius = 2.0;

    let analyzer = ShollAnalyzer::new(params, DescriptorParams::default()).unwrap();
    let report = analyzer.analyze_image(&image);

    // Four spokes, four crossings at every sampled radius.
    assert_eq!(report.profile.len(), 8);
    assert!(report.profile.counts().iter().all(|&c| c == 4.0));

    let stats = report.stats.as_ref().expect("sampled stats");
    assert_eq!(stats.max_count, 4.0);
    assert_eq!(stats.enclosing_radius, 18.0);
    assert_eq!(stats.intersecting_radii, 8);

    // Counts are N/(πr²)-normalized, an exact power law: the log-log line is
    // perfect while the semi-log one is not, so log-log must win.
    let selection = report.method_selection.expect("method selection");
    assert_eq!(selection.preferred, PreferredMethod::LogLog);
    assert!(selection.determination_ratio < 1.0);

    let log_log = report.log_log_regression.as_ref().expect("log-log fit");
    assert!((log_log.full.slope - 2.0).abs() < 1e-6);
    assert!((log_log.full.r_squared - 1.0).abs() < 1e-9);

    let power = report.power_fit.as_ref().expect("power fit");
    assert!((power.params[1] + 2.0).abs() < 1e-6);

    assert!(report.poly_fit.is_some());
    assert!(report.poly_descriptors.is_some());

    let entries = report.descriptor_entries();
    assert!(entries.iter().any(|(name, _)| *name == "Critical value"));
    assert!(entries
        .iter()
        .any(|(name, _)| *name == "Regression coefficient (Log-log)"));
}

#[test]
fn all_background_image_reports_absent_descriptors() {
    let buffer = vec![0u8; 100 * 100];
    let image = ImageU8 {
        w: 100,
        h: 100,
        stride: 100,
        data: &buffer,
    };
    let analyzer = ShollAnalyzer::new(disk_params(100), DescriptorParams::default()).unwrap();
    let report = analyzer.analyze_image(&image);
    assert_eq!(report.profile.len(), 5);
    assert!(report.filtered.is_empty());
    assert!(report.stats.is_none());
    assert!(report.poly_fit.is_none());
    assert!(report.method_selection.is_none());
    assert!(report.descriptor_entries().is_empty());
}

#[test]
fn filled_ball_yields_one_crossing_inside_and_none_outside() {
    let stack = filled_ball_stack(32, 16, 16, 16, 10, 255.0);
    let mut params = ShollParams::for_stack(PointI3::new(16, 16, 16), 32, 32, 32);
    params.start_radius = 4.0;
    params.end_radius = 12.0;
    params.step_radius = 4.0;

    let sampler = ShollSampler::new(params).unwrap();
    let profile = sampler.sample_3d(&stack);
    assert_eq!(profile.counts(), vec![1.0, 1.0, 0.0]);
}

#[test]
fn isolated_voxel_filter_removes_speckle_noise() {
    let mut stack = filled_ball_stack(32, 16, 16, 16, 6, 255.0);
    // Speckle on the radius-10 shell, far from the ball.
    stack.set(26, 16, 16, 255.0);

    let mut params = ShollParams::for_stack(PointI3::new(16, 16, 16), 32, 32, 32);
    params.start_radius = 5.0;
    params.end_radius = 10.0;
    params.step_radius = 5.0;

    let sampler = ShollSampler::new(params.clone()).unwrap();
    assert_eq!(sampler.sample_3d(&stack).counts(), vec![1.0, 1.0]);

    params.skip_single_voxels = true;
    let sampler = ShollSampler::new(params).unwrap();
    assert_eq!(sampler.sample_3d(&stack).counts(), vec![1.0, 0.0]);
}
