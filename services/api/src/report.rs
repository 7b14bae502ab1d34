use crate::infra::parse_date;
use calculateur::config::AppConfig;
use calculateur::error::AppError;
use calculateur::telemetry;
use calculateur::workflows::calculateur::{
    read_case_file, read_profile_file, timeline, AdministrativeDecision, ApplicationKind,
    CaseSituation, ComputationResult, DeadlineService, PermitApplication, RefusalType,
    SilenceAction, VisaRefusalCase,
};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct OutputArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to APP_REFERENCE_DATE, then today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the full result as JSON
    #[arg(long, conflicts_with = "csv")]
    pub(crate) json: bool,
    /// Print the timeline as CSV for calendar import
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ComputeArgs {
    /// JSON file holding `{ "case": ..., "today"?: ... }`
    #[arg(long)]
    pub(crate) case: PathBuf,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum KindArg {
    First,
    Renewal,
}

#[derive(Args, Debug)]
pub(crate) struct RenewalArgs {
    /// First application or renewal
    #[arg(long, value_enum, default_value = "renewal")]
    pub(crate) kind: KindArg,
    /// Motif key (e.g. activite_professionnelle)
    #[arg(long)]
    pub(crate) motif: Option<String>,
    /// Subcategory key (e.g. salarie)
    #[arg(long)]
    pub(crate) subcategory: Option<String>,
    /// Permit type key (e.g. csp_salarie)
    #[arg(long)]
    pub(crate) permit_type: Option<String>,
    /// Delivery date of the current permit
    #[arg(long, value_parser = parse_date)]
    pub(crate) delivery: Option<NaiveDate>,
    /// Expiration date of the current permit
    #[arg(long, value_parser = parse_date)]
    pub(crate) expiration: Option<NaiveDate>,
    /// Client profile JSON used to fill dates and category not given above
    #[arg(long)]
    pub(crate) profile: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

#[derive(Args, Debug)]
pub(crate) struct DecisionArgs {
    /// Decision code (e.g. refus_cnda). Omit to list the known codes.
    #[arg(long)]
    pub(crate) kind: Option<String>,
    /// Notification date of the decision
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RefusalArg {
    Explicit,
    Implicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SilenceArg {
    Tribunal,
    Motives,
}

#[derive(Args, Debug)]
pub(crate) struct VisaArgs {
    /// Deposit confirmation date of the visa application
    #[arg(long, value_parser = parse_date)]
    pub(crate) deposit: NaiveDate,
    /// Visa nature, for the record
    #[arg(long)]
    pub(crate) nature: Option<String>,
    #[arg(long, value_enum)]
    pub(crate) refusal: Option<RefusalArg>,
    /// Notification date of an explicit refusal
    #[arg(long, value_parser = parse_date)]
    pub(crate) notified: Option<NaiveDate>,
    /// Filing date of the RAPO with the visa refusal commission
    #[arg(long, value_parser = parse_date)]
    pub(crate) rapo_filed: Option<NaiveDate>,
    /// Date the commission's reply was received
    #[arg(long, value_parser = parse_date)]
    pub(crate) rapo_reply: Option<NaiveDate>,
    /// Course chosen when the commission stays silent
    #[arg(long, value_enum)]
    pub(crate) on_silence: Option<SilenceArg>,
    #[arg(long, value_parser = parse_date)]
    pub(crate) motives_requested: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    pub(crate) motives_received: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

impl RenewalArgs {
    fn application(&self) -> Result<PermitApplication, AppError> {
        let kind = match self.kind {
            KindArg::First => ApplicationKind::First,
            KindArg::Renewal => ApplicationKind::Renewal,
        };
        let mut application = PermitApplication::new(kind);
        if let Some(motif) = &self.motif {
            application.permit_category.select_motif(motif.as_str());
        }
        if let Some(subcategory) = &self.subcategory {
            application.permit_category.select_subcategory(subcategory.as_str());
        }
        if let Some(permit_type) = &self.permit_type {
            application.permit_category.select_permit_type(permit_type.as_str());
        }
        application.current_delivery_date = self.delivery;
        application.current_expiration_date = self.expiration;

        if let Some(path) = &self.profile {
            let profile = read_profile_file(path)?;
            application.apply_prefill(&profile);
        }
        Ok(application)
    }
}

impl VisaArgs {
    fn case(&self) -> VisaRefusalCase {
        let mut case = VisaRefusalCase::new(self.deposit);
        case.visa_nature = self.nature.clone();
        case.refusal_type = self.refusal.map(|refusal| match refusal {
            RefusalArg::Explicit => RefusalType::Explicit,
            RefusalArg::Implicit => RefusalType::Implicit,
        });
        case.explicit_notification_date = self.notified;
        case.rapo_filing_date = self.rapo_filed;
        case.rapo_response_received = self.rapo_reply.is_some();
        case.rapo_response_date = self.rapo_reply;
        case.chosen_action_on_silence = self.on_silence.map(|action| match action {
            SilenceArg::Tribunal => SilenceAction::GoToTribunal,
            SilenceArg::Motives => SilenceAction::RequestMotives,
        });
        case.motives_request_date = self.motives_requested;
        case.motives_received_date = self.motives_received;
        case
    }
}

fn load_service() -> Result<DeadlineService, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(DeadlineService::standard(config.clock()))
}

pub(crate) fn run_compute(args: ComputeArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let request = read_case_file(&args.case)?;
    let today = service
        .clock()
        .resolve(args.output.today.or(request.today));
    let result = service.compute(&request.situation, Some(today));
    emit(&result, today, &args.output)
}

pub(crate) fn run_renewal(args: RenewalArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let situation = CaseSituation::NewOrRenewalApplication(args.application()?);
    evaluate(&service, &situation, &args.output)
}

pub(crate) fn run_decision(args: DecisionArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let Some(kind) = args.kind else {
        print!("{}", render_decision_kinds(&service));
        return Ok(());
    };
    let situation = CaseSituation::DecisionLitigation(AdministrativeDecision {
        decision_kind: kind,
        decision_date: args.date,
    });
    evaluate(&service, &situation, &args.output)
}

pub(crate) fn run_visa(args: VisaArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let situation = CaseSituation::VisaRefusalAppeal(args.case());
    evaluate(&service, &situation, &args.output)
}

fn evaluate(
    service: &DeadlineService,
    situation: &CaseSituation,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let today = service.clock().resolve(output.today);
    let result = service.compute(situation, Some(today));
    emit(&result, today, output)
}

fn emit(result: &ComputationResult, today: NaiveDate, output: &OutputArgs) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if output.json {
        serde_json::to_writer_pretty(&mut handle, result).map_err(io::Error::from)?;
        writeln!(handle)?;
    } else if output.csv {
        timeline::write_csv(&result.timeline, &mut handle)?;
    } else {
        handle.write_all(render_result(result, today).as_bytes())?;
    }
    Ok(())
}

pub(crate) fn render_result(result: &ComputationResult, today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (evaluated {today})", result.situation.label());
    if let Some(stage) = result.stage {
        let _ = writeln!(out, "Stage: {}", stage.label());
    }
    let _ = writeln!(out, "{}", result.headline);

    match result.days_remaining {
        Some(days) => {
            let _ = writeln!(
                out,
                "Urgency: {} | {days} days remaining",
                result.urgency.label()
            );
        }
        None => {
            let _ = writeln!(out, "Urgency: {}", result.urgency.label());
        }
    }
    if let Some(window) = result.active_window {
        let _ = writeln!(out, "Active window: {} -> {}", window.start, window.end);
    }

    if !result.timeline.is_empty() {
        let _ = writeln!(out, "\nTimeline");
        for event in &result.timeline {
            let mut flags = Vec::new();
            if event.is_deadline {
                flags.push("deadline");
            }
            if event.is_urgent {
                flags.push("urgent");
            }
            if event.is_past {
                flags.push("past");
            }
            if flags.is_empty() {
                let _ = writeln!(out, "- {} {}", event.date, event.label);
            } else {
                let _ = writeln!(out, "- {} {} [{}]", event.date, event.label, flags.join(", "));
            }
        }
    }

    if !result.notes.is_empty() {
        let _ = writeln!(out, "\nNotes");
        for note in &result.notes {
            let _ = writeln!(out, "- {note}");
        }
    }

    if !result.validation_errors.is_empty() {
        let _ = writeln!(out, "\nInformation to complete or correct");
        for issue in &result.validation_errors {
            let _ = writeln!(out, "- {issue}");
        }
    }
    out
}

fn render_decision_kinds(service: &DeadlineService) -> String {
    let mut out = String::from("Known decision kinds\n");
    for view in service.engine().statutes().views() {
        let _ = writeln!(
            out,
            "- {}: {} ({}, {})",
            view.code, view.label, view.delay_label, view.recourse_label
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use calculateur::workflows::calculateur::{Clock, VisaStage};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn visa_args(deposit: NaiveDate) -> VisaArgs {
        VisaArgs {
            deposit,
            nature: None,
            refusal: None,
            notified: None,
            rapo_filed: None,
            rapo_reply: None,
            on_silence: None,
            motives_requested: None,
            motives_received: None,
            output: OutputArgs::default(),
        }
    }

    #[test]
    fn rapo_reply_flag_marks_response_received() {
        let mut args = visa_args(date(2023, 12, 1));
        args.refusal = Some(RefusalArg::Explicit);
        args.notified = Some(date(2024, 1, 15));
        args.rapo_filed = Some(date(2024, 2, 1));
        args.rapo_reply = Some(date(2024, 3, 15));

        let case = args.case();
        assert!(case.rapo_response_received);

        let service = DeadlineService::standard(Clock::Fixed(date(2024, 4, 10)));
        let result = service.compute(&CaseSituation::VisaRefusalAppeal(case), None);
        assert_eq!(result.stage, Some(VisaStage::TribunalDeadlineSet));
    }

    #[test]
    fn renewal_flags_build_full_selection() {
        let args = RenewalArgs {
            kind: KindArg::Renewal,
            motif: Some("activite_professionnelle".to_string()),
            subcategory: Some("salarie".to_string()),
            permit_type: Some("csp_salarie".to_string()),
            delivery: None,
            expiration: Some(date(2025, 1, 1)),
            profile: None,
            output: OutputArgs::default(),
        };

        let application = args.application().expect("no profile to read");
        assert_eq!(
            application.permit_category.permit_type.as_deref(),
            Some("csp_salarie")
        );
        assert_eq!(application.application_kind, ApplicationKind::Renewal);
    }

    #[test]
    fn rendered_report_lists_timeline_and_issues() {
        let service = DeadlineService::standard(Clock::Fixed(date(2024, 3, 1)));
        let mut args = visa_args(date(2024, 1, 10));
        args.refusal = Some(RefusalArg::Explicit);
        args.notified = Some(date(2024, 2, 20));
        let result = service.compute(&CaseSituation::VisaRefusalAppeal(args.case()), None);

        let text = render_result(&result, date(2024, 3, 1));
        assert!(text.starts_with("Visa refusal appeal (evaluated 2024-03-01)"));
        assert!(text.contains("Stage: RAPO window open"));
        assert!(text.contains("Urgency: Warning | 20 days remaining"));
        assert!(text.contains("- 2024-03-21 RAPO deadline (visa refusal commission) [deadline]"));

        args.rapo_filed = Some(date(2024, 2, 10));
        let blocked = service.compute(&CaseSituation::VisaRefusalAppeal(args.case()), None);
        let text = render_result(&blocked, date(2024, 3, 1));
        assert!(text.contains("Information to complete or correct"));
        assert!(text.contains("- rapo_filing_date:"));
    }

    #[test]
    fn decision_kind_listing_covers_table() {
        let service = DeadlineService::standard(Clock::System);
        let text = render_decision_kinds(&service);
        assert!(text.contains("- refus_cnda:"));
        assert!(text.contains("- transfert_dublin:"));
    }
}
