use crate::infra::{load_json, parse_now};
use chrono::{DateTime, Utc};
use clap::Args;
use credit_insights::eligibility::{
    explain_decision, prompt_context, synthesize_offers, CustomerId, DecisionExplanation,
    DecisionSnapshot, Offer, OfferCsvImporter, PathSummary, Profile, ProfileInput,
    TemplateNarrator,
};
use credit_insights::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct OffersArgs {
    /// Customer identifier used for offer ids and persisted-offer lookup
    #[arg(long)]
    pub(crate) customer: String,
    /// JSON file holding the customer profile fields
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Optional CSV export of previously persisted offers
    #[arg(long)]
    pub(crate) offers_csv: Option<PathBuf>,
    /// Evaluation time (RFC 3339 or YYYY-MM-DD, defaults to now)
    #[arg(long, value_parser = parse_now)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print the assistant prompt context after the offer list
    #[arg(long)]
    pub(crate) prompt_context: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExplainArgs {
    /// JSON file holding the decision snapshot
    #[arg(long)]
    pub(crate) decision: PathBuf,
    /// Emit the explanation as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_offers(args: OffersArgs) -> Result<(), AppError> {
    print!("{}", offers_report(args)?);
    Ok(())
}

pub(crate) fn run_explain(args: ExplainArgs) -> Result<(), AppError> {
    print!("{}", explain_report(args)?);
    Ok(())
}

fn offers_report(args: OffersArgs) -> Result<String, AppError> {
    let OffersArgs {
        customer,
        profile,
        offers_csv,
        now,
        prompt_context: show_context,
    } = args;

    let input: ProfileInput = load_json(&profile)?;
    let profile = Profile::from_input(input)?;
    let customer_id = CustomerId(customer);
    let now = now.unwrap_or_else(Utc::now);

    let persisted = match offers_csv {
        Some(path) => OfferCsvImporter::from_path(path)?,
        None => Vec::new(),
    };

    let offers = synthesize_offers(&profile, &customer_id, &persisted, now);
    let mut report = render_offers(&customer_id, &offers, now);

    if show_context {
        report.push_str("\nAssistant context\n");
        report.push_str(&prompt_context(&profile, &[], &offers));
    }

    Ok(report)
}

fn explain_report(args: ExplainArgs) -> Result<String, AppError> {
    let snapshot: DecisionSnapshot = load_json(&args.decision)?;
    let explanation = explain_decision(&snapshot, &TemplateNarrator);

    if args.json {
        let mut json = serde_json::to_string_pretty(&explanation)?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(render_explanation(&explanation))
    }
}

fn render_offers(customer_id: &CustomerId, offers: &[Offer], now: DateTime<Utc>) -> String {
    let mut out = format!("Pre-approved offers for {customer_id}\n");
    out.push_str(&format!(
        "Evaluated at {}\n",
        now.format("%Y-%m-%d %H:%M UTC")
    ));

    if offers.is_empty() {
        out.push_str("\nNo offers available for this profile.\n");
        return out;
    }

    out.push('\n');
    for offer in offers {
        let mut extras = Vec::new();
        if let Some(cashback) = offer.cashback_percent {
            extras.push(format!("{cashback:.1}% cashback"));
        }
        if let Some(points) = offer.reward_points {
            extras.push(format!("{points} reward points"));
        }
        let extras = if extras.is_empty() {
            String::new()
        } else {
            format!(" | {}", extras.join(", "))
        };

        out.push_str(&format!(
            "- {} [{}]: up to {} at {:.2}% | fee {} | expires {}{}\n",
            offer.offer_type.label(),
            offer.id,
            offer.eligible_amount,
            offer.interest_rate,
            offer.processing_fee,
            offer.expires_at.format("%Y-%m-%d"),
            extras
        ));
    }
    out
}

fn render_path(label: &str, path: &PathSummary) -> String {
    match path {
        PathSummary::Scenario {
            scenario_name,
            impact_on_approval_percent,
            ..
        } => format!("- {label}: {scenario_name} (+{impact_on_approval_percent}%)\n"),
        PathSummary::NoImprovementNeeded => format!("- {label}: no improvement needed\n"),
    }
}

fn render_explanation(explanation: &DecisionExplanation) -> String {
    let decision_id = if explanation.decision_id.is_empty() {
        "(unnamed)"
    } else {
        explanation.decision_id.as_str()
    };
    let mut out = format!("Decision {decision_id}: {}\n", explanation.outcome);

    out.push_str("\nFactors\n");
    if explanation.factors.is_empty() {
        out.push_str("- none evaluated\n");
    }
    for factor in &explanation.factors {
        out.push_str(&format!(
            "- {}: actual {} vs required {} -> {}\n",
            factor.name,
            factor.actual_value,
            factor.required_value,
            if factor.passed { "pass" } else { "fail" }
        ));
    }

    if explanation.scenarios.is_empty() {
        out.push_str("\nImprovement scenarios: none needed\n");
        return out;
    }

    out.push_str("\nImprovement scenarios\n");
    for (scenario, narration) in explanation.scenarios.iter().zip(&explanation.narrations) {
        out.push_str(&format!(
            "- {} | {} | {} | {}% impact\n",
            scenario.scenario_name,
            scenario.difficulty.label(),
            scenario.timeframe,
            scenario.impact_on_approval_percent
        ));
        out.push_str(&format!("  {}\n", narration.summary));
        out.push_str(&format!("  Cost: {}\n", scenario.cost_estimate));
        for step in &scenario.action_steps {
            out.push_str(&format!("    * {step}\n"));
        }
    }

    out.push_str("\nSuggested paths\n");
    out.push_str(&render_path("Easiest", &explanation.easiest_path));
    out.push_str(&render_path("Fastest", &explanation.fastest_path));
    out.push_str(&render_path("Most impactful", &explanation.most_impactful));
    out
}
