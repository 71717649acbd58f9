use crate::analysis::{lesion_info, AnalysisOutcome, HealthStatus, RiskTier};
use crate::auth::Session;
use colored::*;

pub fn print_welcome(base_url: &str) {
    println!("{}", "OncoDerma".bold().cyan());
    println!("  {}: {}", "Prediction service".yellow(), base_url);
    println!();
}

pub fn risk_label(risk: RiskTier) -> ColoredString {
    match risk {
        RiskTier::High => "ALTO".red().bold(),
        RiskTier::Medium => "MEDIO".yellow().bold(),
        RiskTier::Low => "BAJO".green().bold(),
    }
}

pub fn print_outcome(outcome: &AnalysisOutcome) {
    match outcome {
        AnalysisOutcome::Completed(report) => {
            let result = &report.result;
            println!("{}", "Resultado del análisis:".bold().underline().blue());
            if report.from_cache {
                println!("  {}", "(resultado desde caché)".dimmed());
            }

            let top = lesion_info(result.top_class());
            println!(
                "  {}: {} ({:.1}%)",
                "Más probable".yellow(),
                top.map_or(result.top_class(), |info| info.name),
                result.top_probability() * 100.0
            );
            if let Some(info) = top {
                println!("  {}: {}", "Descripción".yellow(), info.description);
            }
            println!("  {}: {}", "Riesgo".yellow(), risk_label(result.risk));
            println!();

            for prediction in &result.predictions {
                let name = lesion_info(&prediction.class).map_or("", |info| info.full_name);
                println!(
                    "  {:<6} {:>6.1}%  {}",
                    prediction.class,
                    prediction.probability * 100.0,
                    name
                );
            }
            if let Some(fingerprint) = &report.fingerprint {
                println!();
                println!(
                    "  {}: {} ({})",
                    "Huella".yellow(),
                    fingerprint.token,
                    fingerprint.method
                );
            }
        }
        AnalysisOutcome::Failed(failure) => {
            println!("{}", format!("[{}] {}", failure.code, failure.message).red().bold());
            println!("{}", "Vuelve a intentarlo cuando el problema esté resuelto.".dimmed());
        }
        AnalysisOutcome::Cancelled => {
            println!("{}", "Análisis cancelado".yellow());
        }
    }
}

pub fn print_health(status: &HealthStatus) {
    if status.healthy {
        println!("{}", status.message.green().bold());
    } else {
        println!("{}", status.message.red().bold());
    }
    if let Some(detail) = &status.detail {
        println!("  {}", detail.dimmed());
    }
}

pub fn print_session(session: Option<&Session>) {
    match session {
        Some(session) => {
            println!("{}", "Sesión activa:".bold().underline().blue());
            println!("  {}: {}", "Usuario".yellow(), session.user.username);
            if let Some(name) = &session.user.name {
                println!("  {}: {}", "Nombre".yellow(), name);
            }
            if let Some(role) = &session.user.role {
                println!("  {}: {}", "Rol".yellow(), role);
            }
        }
        None => println!("{}", "No hay una sesión activa".yellow()),
    }
}
