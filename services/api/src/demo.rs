use crate::report::render_result;
use calculateur::error::AppError;
use calculateur::workflows::calculateur::{
    AdministrativeDecision, ApplicationKind, CaseSituation, DeadlineEngine, PermitApplication,
    RefusalType, VisaRefusalCase,
};
use chrono::NaiveDate;
use clap::Args;
use std::io::{self, Write};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print each result as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

/// Reference case evaluated on its own pinned date.
pub(crate) struct Scenario {
    pub(crate) title: &'static str,
    pub(crate) today: NaiveDate,
    pub(crate) situation: CaseSituation,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("reference scenario date is valid")
}

pub(crate) fn reference_scenarios() -> Vec<Scenario> {
    let silent_consulate = VisaRefusalCase::new(date(2024, 1, 10));

    let mut commission_replied = VisaRefusalCase::new(date(2023, 12, 1));
    commission_replied.refusal_type = Some(RefusalType::Explicit);
    commission_replied.explicit_notification_date = Some(date(2024, 1, 15));
    commission_replied.rapo_filing_date = Some(date(2024, 2, 1));
    commission_replied.rapo_response_received = true;
    commission_replied.rapo_response_date = Some(date(2024, 3, 15));

    let mut renewal = PermitApplication::new(ApplicationKind::Renewal);
    renewal.permit_category.select_motif("activite_professionnelle");
    renewal.permit_category.select_subcategory("salarie");
    renewal.permit_category.select_permit_type("csp_salarie");
    renewal.current_delivery_date = Some(date(2021, 1, 2));
    renewal.current_expiration_date = Some(date(2025, 1, 1));

    vec![
        Scenario {
            title: "Visa application left unanswered for more than four months",
            today: date(2024, 6, 1),
            situation: CaseSituation::VisaRefusalAppeal(silent_consulate),
        },
        Scenario {
            title: "CNDA rejection, appeal in cassation",
            today: date(2024, 3, 29),
            situation: CaseSituation::DecisionLitigation(AdministrativeDecision {
                decision_kind: "refus_cnda".to_string(),
                decision_date: Some(date(2024, 3, 1)),
            }),
        },
        Scenario {
            title: "Visa refusal commission replied to the RAPO",
            today: date(2024, 4, 10),
            situation: CaseSituation::VisaRefusalAppeal(commission_replied),
        },
        Scenario {
            title: "Multi-year salaried permit renewal",
            today: date(2024, 10, 1),
            situation: CaseSituation::NewOrRenewalApplication(renewal),
        },
    ]
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = DeadlineEngine::standard();
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "Legal deadline calculator demo")?;
    for (index, scenario) in reference_scenarios().into_iter().enumerate() {
        let result = engine.compute(&scenario.situation, scenario.today);
        writeln!(handle, "\n[{}] {}", index + 1, scenario.title)?;
        if args.json {
            serde_json::to_writer_pretty(&mut handle, &result).map_err(io::Error::from)?;
            writeln!(handle)?;
        } else {
            handle.write_all(render_result(&result, scenario.today).as_bytes())?;
        }
    }
    Ok(())
}
