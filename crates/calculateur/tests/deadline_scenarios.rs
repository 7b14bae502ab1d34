use calculateur::workflows::calculateur::{
    parse_case, timeline, AdministrativeDecision, ApplicationKind, CaseSituation, Clock,
    DeadlineEngine, DeadlineService, PermitApplication, ProfilePrefill, RefusalType,
    SilenceAction, Urgency, VisaRefusalCase, VisaStage,
};
use calculateur::workflows::calculateur::engine::RAPO_DELAY_DAYS;
use chrono::{Duration, NaiveDate};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn silent_consulate_past_four_months_has_no_recourse() {
    let engine = DeadlineEngine::standard();
    let situation = CaseSituation::VisaRefusalAppeal(VisaRefusalCase::new(date(2024, 1, 10)));

    let result = engine.compute(&situation, date(2024, 6, 1));

    assert_eq!(result.stage, Some(VisaStage::NoRecourse));
    assert!(result.stage.expect("stage").is_terminal());
    assert_eq!(result.days_remaining, Some(-22));
    assert!(result.headline.contains("2024-05-10"));
}

#[test]
fn cnda_rejection_case_file_through_service() {
    let request = parse_case(
        r#"{
            "case": {
                "situation": "decision_litigation",
                "decision_kind": " REFUS_CNDA ",
                "decision_date": "2024-03-01"
            },
            "today": "2024-03-29"
        }"#,
    )
    .expect("case parses");

    let service = DeadlineService::standard(Clock::System);
    let result = service.compute(&request.situation, request.today);

    assert_eq!(result.days_remaining, Some(3));
    assert_eq!(result.urgency, Urgency::Urgent);
    assert!(!result.default_applied);
    assert_eq!(
        result.event("appeal_deadline").expect("deadline").date,
        date(2024, 4, 1)
    );
}

#[test]
fn commission_reply_keeps_its_deadline_as_reference() {
    let mut case = VisaRefusalCase::new(date(2023, 12, 1));
    case.refusal_type = Some(RefusalType::Explicit);
    case.explicit_notification_date = Some(date(2024, 1, 15));
    case.rapo_filing_date = Some(date(2024, 2, 1));
    case.rapo_response_received = true;
    case.rapo_response_date = Some(date(2024, 3, 15));

    let result = DeadlineEngine::standard()
        .compute(&CaseSituation::VisaRefusalAppeal(case), date(2024, 4, 10));

    let reference = result.event("commission_deadline").expect("reference entry");
    assert_eq!(reference.date, date(2024, 4, 1));
    assert!(!reference.is_deadline);
    let window = result.active_window.expect("tribunal window");
    assert_eq!((window.start, window.end), (date(2024, 3, 16), date(2024, 5, 15)));
}

#[test]
fn renewal_from_profile_prefill() {
    let profile: ProfilePrefill = serde_json::from_str(
        r#"{
            "permit_category": {
                "motif": "activite_professionnelle",
                "subcategory": "salarie",
                "permit_type": "csp_salarie"
            },
            "delivery_date": "2021-01-02",
            "expiration_date": "2025-01-01"
        }"#,
    )
    .expect("profile parses");

    let application = PermitApplication::from_profile(&profile, ApplicationKind::Renewal);
    let result = DeadlineEngine::standard().compute(
        &CaseSituation::NewOrRenewalApplication(application),
        date(2024, 10, 1),
    );

    assert_eq!(result.days_remaining, Some(92));
    assert_eq!(result.urgency, Urgency::Nominal);
    let window = result.active_window.expect("renewal window");
    assert!(window.contains(date(2024, 10, 1)));
}

#[test]
fn explicit_rapo_deadline_is_thirty_days_after_notification() {
    let engine = DeadlineEngine::standard();
    let notifications = [date(2024, 1, 31), date(2024, 2, 29), date(2024, 12, 15)];

    for notified in notifications {
        let mut case = VisaRefusalCase::new(date(2023, 11, 1));
        case.refusal_type = Some(RefusalType::Explicit);
        case.explicit_notification_date = Some(notified);

        let result = engine.compute(&CaseSituation::VisaRefusalAppeal(case), notified);
        assert_eq!(
            result.event("rapo_window_end").expect("rapo deadline").date,
            notified + Duration::days(RAPO_DELAY_DAYS)
        );
    }
}

#[test]
fn implicit_refusal_clamps_to_month_end() {
    let mut case = VisaRefusalCase::new(date(2023, 10, 31));
    case.refusal_type = Some(RefusalType::Implicit);

    let result = DeadlineEngine::standard()
        .compute(&CaseSituation::VisaRefusalAppeal(case), date(2024, 3, 1));

    assert_eq!(result.event("refusal").expect("refusal").date, date(2024, 2, 29));
}

#[test]
fn days_remaining_decreases_one_per_day_and_flips_once() {
    let engine = DeadlineEngine::standard();
    let situation = CaseSituation::DecisionLitigation(AdministrativeDecision {
        decision_kind: "transfert_dublin".to_string(),
        decision_date: Some(date(2024, 6, 1)),
    });

    let mut previous: Option<i64> = None;
    let mut flips = 0;
    let mut day = date(2024, 6, 1);
    while day <= date(2024, 6, 30) {
        let result = engine.compute(&situation, day);
        let days = result.days_remaining.expect("deadline resolved");
        if let Some(previous) = previous {
            assert_eq!(days, previous - 1);
            if previous >= 0 && days < 0 {
                flips += 1;
            }
        }
        assert_eq!(result.urgency == Urgency::Overdue, days < 0);
        previous = Some(days);
        day += Duration::days(1);
    }
    assert_eq!(flips, 1);
}

#[test]
fn repeated_computation_is_byte_identical() {
    let mut case = VisaRefusalCase::new(date(2023, 12, 1));
    case.refusal_type = Some(RefusalType::Explicit);
    case.explicit_notification_date = Some(date(2024, 1, 15));
    case.rapo_filing_date = Some(date(2024, 2, 1));
    case.chosen_action_on_silence = Some(SilenceAction::RequestMotives);
    case.motives_request_date = Some(date(2024, 4, 10));
    let situation = CaseSituation::VisaRefusalAppeal(case);

    let service = DeadlineService::standard(Clock::Fixed(date(2024, 5, 1)));
    let first = serde_json::to_vec(&service.compute(&situation, None)).expect("serializes");
    let second = serde_json::to_vec(&service.compute(&situation, None)).expect("serializes");
    assert_eq!(first, second);
}

#[test]
fn timeline_exports_as_csv() {
    let situation = CaseSituation::DecisionLitigation(AdministrativeDecision {
        decision_kind: "refus_cnda".to_string(),
        decision_date: Some(date(2024, 3, 1)),
    });
    let result = DeadlineEngine::standard().compute(&situation, date(2024, 3, 29));

    let mut buffer = Vec::new();
    timeline::write_csv(&result.timeline, &mut buffer).expect("csv written");
    let text = String::from_utf8(buffer).expect("utf-8");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("date,key,label,deadline,urgent,past"));
    assert!(lines.next().expect("decision row").starts_with("2024-03-01,decision_notified,"));
    assert!(lines
        .next()
        .expect("deadline row")
        .starts_with("2024-04-01,appeal_deadline,"));
}
