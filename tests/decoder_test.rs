use approx::assert_abs_diff_eq;

use vordecoder::config::VorConfig;
use vordecoder::signal_processing::angle_error;
use vordecoder::simulation::{VorSignalParams, generate_vor_signal};
use vordecoder::vor::{VorDecoder, WavDumpObserver};
use vordecoder::wav::{read_mono_wav, save_signal};
use vordecoder::VorError;

/// 44.1 kHz captures need a decimated rate that divides 44100
fn config_44k1() -> VorConfig {
    VorConfig {
        decimated_rate: 8820,
        ..VorConfig::default()
    }
}

fn decode_bearing(config: &VorConfig, params: &VorSignalParams) -> f64 {
    let capture = generate_vor_signal(params).unwrap();
    let decoder = VorDecoder::new(config.clone()).unwrap();
    decoder.decode(&capture).unwrap().bearing.degrees
}

#[test]
fn test_synthetic_bearings_at_44k1() {
    let config = config_44k1();
    for bearing in [0.0, 45.0, 90.0, 137.0, 180.0, 225.0, 300.0, 359.0] {
        let measured = decode_bearing(&config, &VorSignalParams::new(44100, bearing));
        let error = angle_error(measured, bearing);
        assert!(
            error.abs() <= 2.0,
            "Bearing error too large: expected {}, got {}, error {}",
            bearing,
            measured,
            error
        );
    }
}

#[test]
fn test_synthetic_bearings_with_default_config() {
    let config = VorConfig::default();
    for bearing in [0.0, 45.0, 90.0, 200.0, 315.0] {
        let measured = decode_bearing(&config, &VorSignalParams::new(48000, bearing));
        let error = angle_error(measured, bearing);
        assert!(
            error.abs() <= 2.0,
            "expected {}, got {}, error {}",
            bearing,
            measured,
            error
        );
    }
}

#[test]
fn test_angle_offset_shifts_bearing() {
    let mut config = config_44k1();
    config.bearing.angle_offset_degrees = 40.0;

    let measured = decode_bearing(&config, &VorSignalParams::new(44100, 90.0));
    let error = angle_error(measured, 130.0);
    assert!(error.abs() <= 2.0, "expected 130, got {}", measured);
}

#[test]
fn test_parallel_paths_match_sequential() {
    let capture = generate_vor_signal(&VorSignalParams::new(48000, 222.0)).unwrap();

    let sequential = VorDecoder::new(VorConfig::default())
        .unwrap()
        .decode(&capture)
        .unwrap();
    let parallel = VorDecoder::new(VorConfig {
        parallel_paths: true,
        ..VorConfig::default()
    })
    .unwrap()
    .decode(&capture)
    .unwrap();

    assert_eq!(sequential.bearing, parallel.bearing);
    assert_eq!(sequential.variable, parallel.variable);
    assert_eq!(sequential.reference, parallel.reference);
}

#[test]
fn test_decoded_buffers_share_decimated_rate() {
    let capture = generate_vor_signal(&VorSignalParams::new(44100, 10.0)).unwrap();
    let decoded = VorDecoder::new(config_44k1())
        .unwrap()
        .decode(&capture)
        .unwrap();

    assert_eq!(decoded.reference.rate(), 8820);
    assert_eq!(decoded.variable.rate(), 8820);
    assert_eq!(decoded.fm_baseband.rate(), 8820);
    assert_eq!(decoded.bearing.rate, 8820);
    assert_eq!(decoded.reference.len(), 17640);
    assert!(decoded.variable.delay() > decoded.reference.delay());
    assert!(decoded.bearing.correlation > 0.9);
}

#[test]
fn test_fm_export_is_peak_normalized() {
    let capture = generate_vor_signal(&VorSignalParams::new(48000, 60.0)).unwrap();
    let decoded = VorDecoder::new(VorConfig::default())
        .unwrap()
        .decode(&capture)
        .unwrap();

    let export = decoded.fm_export();
    assert_eq!(export.rate(), 6000);
    assert_eq!(export.len(), decoded.fm_baseband.len());
    assert_abs_diff_eq!(export.peak(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_decode_through_wav_file() {
    let dir = std::env::temp_dir().join(format!("vordecoder_it_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("capture.wav");

    let capture = generate_vor_signal(&VorSignalParams::new(44100, 250.0)).unwrap();
    save_signal(&path, &capture, true).unwrap();

    let loaded = read_mono_wav(&path).unwrap();
    assert_eq!(loaded.rate(), 44100);
    assert_eq!(loaded.len(), capture.len());

    let decoder = VorDecoder::new(config_44k1()).unwrap();
    let mut observer = WavDumpObserver::new(dir.join("stages")).unwrap();
    let decoded = decoder.decode_with_observer(&loaded, &mut observer).unwrap();

    assert!(angle_error(decoded.bearing.degrees, 250.0).abs() <= 2.0);
    assert_eq!(observer.written().len(), 7);
    assert!(observer.written().iter().all(|p| p.exists()));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_incompatible_rate_rejected() {
    let capture = generate_vor_signal(&VorSignalParams::new(44100, 0.0)).unwrap();
    let result = VorDecoder::new(VorConfig::default())
        .unwrap()
        .decode(&capture);
    assert!(matches!(
        result,
        Err(VorError::IncompatibleRate {
            input: 44100,
            output: 6000
        })
    ));
}

#[test]
fn test_short_capture_rejected() {
    let params = VorSignalParams {
        duration_secs: 0.1,
        ..VorSignalParams::new(48000, 0.0)
    };
    let capture = generate_vor_signal(&params).unwrap();
    let result = VorDecoder::new(VorConfig::default())
        .unwrap()
        .decode(&capture);
    assert!(matches!(
        result,
        Err(VorError::InsufficientSignal {
            available: 4800,
            ..
        })
    ));
}
