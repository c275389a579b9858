use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Seeded RNG, or a randomly seeded one when `seed` is `None`
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

pub fn signal_power(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f64>() / signal.len() as f64
}

/// Add white Gaussian noise at `snr_db` relative to the current signal power
pub fn add_awgn(signal: &mut [f64], snr_db: f64, rng: &mut ChaCha8Rng) {
    let sig_power = signal_power(signal);
    if sig_power == 0.0 {
        return;
    }

    let noise_power = sig_power / 10f64.powf(snr_db / 10.0);
    let Ok(normal) = Normal::new(0.0, noise_power.sqrt()) else {
        log::warn!("Skipping noise: invalid SNR {} dB", snr_db);
        return;
    };

    for sample in signal.iter_mut() {
        *sample += normal.sample(rng);
    }
}
