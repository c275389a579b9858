use vordecoder::config::VorConfig;
use vordecoder::simulation::{
    VorSignalParams, measure_bearing_error, measure_error_across_bearings,
};
use vordecoder::vor::VorDecoder;

#[test]
fn test_awgn_10db() {
    let decoder = VorDecoder::new(VorConfig::default()).unwrap();
    for (i, bearing) in [30.0, 150.0, 270.0].into_iter().enumerate() {
        let params = VorSignalParams::new(48000, bearing).with_awgn(10.0, 100 + i as u64);
        let error = measure_bearing_error(&decoder, &params).unwrap();
        assert!(
            error.abs() <= 3.0,
            "bearing {} at 10 dB SNR: error {:.2}",
            bearing,
            error
        );
    }
}

#[test]
fn test_carrier_detuned_by_20hz() {
    // Subcarrier 20 Hz off the configured shift still recovers the bearing
    let decoder = VorDecoder::new(VorConfig::default()).unwrap();
    let params = VorSignalParams {
        carrier_hz: 9980.0,
        ..VorSignalParams::new(48000, 75.0)
    };
    let error = measure_bearing_error(&decoder, &params).unwrap();
    assert!(error.abs() <= 3.0, "error {:.2}", error);
}

#[test]
fn test_sweep_of_bearings_at_48k() {
    let decoder = VorDecoder::new(VorConfig::default()).unwrap();
    let bearings: Vec<f64> = (0..12).map(|i| i as f64 * 30.0).collect();

    let stats =
        measure_error_across_bearings(&decoder, &VorSignalParams::default(), &bearings).unwrap();
    assert!(
        stats.max_abs_error <= 2.0,
        "max error {:.2} at {}",
        stats.max_abs_error,
        stats.worst_bearing
    );
    assert!(stats.mean_abs_error <= stats.max_abs_error);
}
