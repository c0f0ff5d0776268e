//! Demo-mode placeholder results.
//!
//! These are fabricated, not inferred.  They are only produced when demo
//! mode is enabled and a real request failed.

use rand::Rng;

use agro_common::disease::{DiseaseResult, HealthStatus, PLACEHOLDER_DISEASES};

/// Random status, confidence in `[80, 100)` and a label from
/// [`PLACEHOLDER_DISEASES`] when the status is diseased.
pub fn placeholder_disease<R: Rng + ?Sized>(rng: &mut R) -> DiseaseResult {
    let status = if rng.gen_bool(0.5) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Diseased
    };
    let confidence = rng.gen_range(80..100);
    let label = PLACEHOLDER_DISEASES[rng.gen_range(0..PLACEHOLDER_DISEASES.len())];

    DiseaseResult {
        status,
        confidence,
        disease: (status == HealthStatus::Diseased).then(|| label.to_string()),
        raw_label: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_placeholder_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen_healthy = false;
        let mut seen_diseased = false;
        for _ in 0..200 {
            let r = placeholder_disease(&mut rng);
            assert!((80..100).contains(&r.confidence));
            match r.status {
                HealthStatus::Healthy => {
                    seen_healthy = true;
                    assert!(r.disease.is_none());
                }
                HealthStatus::Diseased => {
                    seen_diseased = true;
                    let label = r.disease.unwrap();
                    assert!(PLACEHOLDER_DISEASES.contains(&label.as_str()));
                }
            }
        }
        assert!(seen_healthy && seen_diseased);
    }
}
