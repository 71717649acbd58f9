use super::{AnalysisFailure, AnalysisResult, ErrorCode, Prediction, RiskTier};
use crate::http::PredictResponse;
use std::collections::BTreeMap;

/// Classes the deployed model scores; always present in the probability map.
pub const MODEL_CLASSES: [&str; 4] = ["mel", "nv", "bcc", "bkl"];

pub fn normalize(response: PredictResponse) -> Result<AnalysisResult, AnalysisFailure> {
    if response.top3.is_empty() {
        return Err(AnalysisFailure::new(ErrorCode::ProcessingFailed));
    }

    let mut predictions = Vec::with_capacity(response.top3.len());
    for ranked in response.top3 {
        let class = ranked.class.trim().to_lowercase();
        if class.is_empty() || !ranked.prob.is_finite() || !(0.0..=1.0).contains(&ranked.prob) {
            return Err(AnalysisFailure::new(ErrorCode::ProcessingFailed));
        }
        predictions.push(Prediction {
            class,
            probability: ranked.prob,
        });
    }

    let mut probabilities: BTreeMap<String, f64> = MODEL_CLASSES
        .iter()
        .map(|class| (class.to_string(), 0.0))
        .collect();
    for prediction in &predictions {
        probabilities.insert(prediction.class.clone(), prediction.probability);
    }

    let most_likely = predictions[0].clone();
    let risk = RiskTier::from_probability(most_likely.probability);

    Ok(AnalysisResult {
        predictions,
        most_likely,
        probabilities,
        risk,
    })
}
