//! Integration tests for the questionnaire model and the global-id batch scan

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use example_questionnaires::{
    ATTENDANCE, COMMENTS, OVERALL, PACE, PACE_BY_SEMESTER, RATING, SEMESTER, course_evaluation,
    course_evaluation_with_box_size, workshop_feedback,
};
use formscan::{
    Answer, DataField, FieldValue, ModelError, QObjectId, Questionnaire, ScanConfig, Sheet,
    TestScanner, find_global_ids,
};

fn box_id(questionnaire: &Questionnaire, question: QObjectId, value: u32) -> formscan::BoxId {
    questionnaire
        .qobject(question)
        .and_then(|q| q.scan_box(value))
        .map(|b| b.id())
        .unwrap()
}

#[test]
fn same_definition_same_fingerprint() {
    assert_eq!(
        course_evaluation().fingerprint(),
        course_evaluation().fingerprint()
    );
    assert_ne!(
        course_evaluation().fingerprint(),
        course_evaluation_with_box_size(4.0).fingerprint()
    );
}

#[test]
fn different_forms_different_fingerprints() {
    let workshop = workshop_feedback();
    workshop.validate().unwrap();
    assert_ne!(workshop.fingerprint(), course_evaluation().fingerprint());
    assert_eq!(workshop.page_count(), 1);
}

#[test]
fn four_step_rating_round_trip() {
    let workshop = workshop_feedback();
    let mut sheet = Sheet::new();

    for answer in 1..=4 {
        workshop.set_answer(&mut sheet, RATING, answer).unwrap();
        assert_eq!(
            workshop.get_answer(&sheet, RATING).unwrap(),
            Answer::Mark(answer as u32)
        );
    }

    // One step past the last box leaves nothing marked.
    workshop.set_answer(&mut sheet, RATING, 5).unwrap();
    assert_eq!(
        workshop.get_answer(&sheet, RATING).unwrap(),
        Answer::Mark(Answer::INVALID_MARK)
    );
}

#[test]
fn example_is_valid() {
    let questionnaire = course_evaluation();
    questionnaire.validate().unwrap();
    assert_eq!(questionnaire.page_count(), 2);
    assert_eq!(questionnaire.survey(), Some("Course evaluation"));
}

#[test]
fn sheets_are_independent() {
    let questionnaire = course_evaluation();
    let lab = box_id(&questionnaire, ATTENDANCE, 2);

    let mut first = Sheet::new();
    let second = Sheet::new();
    questionnaire.set_box_state(&mut first, lab, true).unwrap();

    assert_eq!(
        questionnaire.get_answer(&first, ATTENDANCE).unwrap(),
        Answer::Choices(vec![2])
    );
    assert_eq!(
        questionnaire.get_answer(&second, ATTENDANCE).unwrap(),
        Answer::Choices(vec![])
    );
    assert!(second.is_empty());
}

#[test]
fn answers_on_an_untouched_sheet() {
    let questionnaire = course_evaluation();
    let sheet = Sheet::new();

    assert_eq!(
        questionnaire.get_answer(&sheet, SEMESTER).unwrap(),
        Answer::Choice(Answer::NO_CHOICE)
    );
    assert_eq!(
        questionnaire.get_answer(&sheet, PACE).unwrap(),
        Answer::Mark(Answer::INVALID_MARK)
    );
    assert_eq!(
        questionnaire.get_answer(&sheet, COMMENTS).unwrap(),
        Answer::Text(false)
    );
    assert_eq!(
        questionnaire.get_answer(&sheet, OVERALL).unwrap(),
        Answer::Value(0)
    );
    assert_eq!(
        questionnaire.get_answer(&sheet, PACE_BY_SEMESTER).unwrap(),
        Answer::Histogram(vec![])
    );
}

#[test]
fn single_choice_prefers_quality() {
    let questionnaire = course_evaluation();
    let mut sheet = Sheet::new();
    for (value, quality) in [(0, 0.9), (1, 0.4), (3, 0.7)] {
        let id = box_id(&questionnaire, SEMESTER, value);
        questionnaire.set_box_state(&mut sheet, id, true).unwrap();
        questionnaire.set_box_quality(&mut sheet, id, quality).unwrap();
    }

    // The "no answer" box never wins.
    assert_eq!(
        questionnaire.get_answer(&sheet, SEMESTER).unwrap(),
        Answer::Choice(3)
    );
}

#[test]
fn mark_round_trip() {
    let questionnaire = course_evaluation();
    let mut sheet = Sheet::new();

    for answer in 1..=5 {
        questionnaire.set_answer(&mut sheet, PACE, answer).unwrap();
        assert_eq!(
            questionnaire.get_answer(&sheet, PACE).unwrap(),
            Answer::Mark(answer as u32)
        );
    }
}

#[test]
fn set_answer_on_additional_mark() {
    let questionnaire = course_evaluation();
    let mut sheet = Sheet::new();
    questionnaire.set_answer(&mut sheet, OVERALL, 4).unwrap();
    assert_eq!(
        questionnaire.get_answer(&sheet, OVERALL).unwrap(),
        Answer::Value(4)
    );
}

#[test]
fn set_answer_unsupported() {
    let questionnaire = course_evaluation();
    let mut sheet = Sheet::new();
    for id in [SEMESTER, ATTENDANCE, COMMENTS] {
        let result = questionnaire.set_answer(&mut sheet, id, 1);
        assert!(
            matches!(result, Err(ModelError::Unsupported { .. })),
            "{id} accepted an answer"
        );
    }
}

#[test]
fn listeners_see_every_write() {
    let mut questionnaire = course_evaluation();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    questionnaire.connect_data_changed(move |change| {
        sink.lock()
            .unwrap()
            .push((change.element.id(), change.field, change.old_value.clone()));
    });

    let mut sheet = Sheet::new();
    questionnaire.set_answer(&mut sheet, PACE, 2).unwrap();
    questionnaire.set_answer(&mut sheet, OVERALL, 3).unwrap();

    let seen = seen.lock().unwrap();
    // Five boxes of the mark, then the additional mark's value.
    assert_eq!(seen.len(), 6);
    assert_eq!(
        seen[1],
        (
            box_id(&questionnaire, PACE, 1).into(),
            DataField::State,
            FieldValue::State(false)
        )
    );
    assert_eq!(
        seen[5],
        (OVERALL.into(), DataField::Value, FieldValue::Value(0))
    );
}

#[test]
fn restored_definition_matches() {
    let original = course_evaluation();
    let restored = Questionnaire::from_json(&original.to_json().unwrap()).unwrap();
    assert_eq!(restored.fingerprint(), original.fingerprint());
    assert_eq!(restored.to_string(), original.to_string());
}

#[test]
fn batch_skips_non_monochrome_files() {
    let scanner = TestScanner::new()
        .with_pages("/survey/scans/a.tif", [Some("0001"), None])
        .with_invalid("/survey/scans/photo.tif")
        .with_pages("/survey/scans/b.tif", [Some("0003")])
        .with_rotated("/survey/scans/b.tif", 0);
    let config = ScanConfig::default().with_survey_dir("/survey");
    let files: Vec<PathBuf> = ["a.tif", "photo.tif", "b.tif"]
        .iter()
        .map(|name| PathBuf::from("/survey/scans").join(name))
        .collect();

    let mut out = Vec::new();
    let results = find_global_ids(&files, &scanner, &scanner, &config, &mut out).unwrap();

    let expected = "Processing /survey/scans/a.tif\n\
                    * (\"scans/a.tif\", 0, Some(\"0001\"))\n\
                    * (\"scans/a.tif\", 1, None)\n\
                    Processing /survey/scans/photo.tif\n\
                    Invalid input file /survey/scans/photo.tif. You need to specify a (multipage) monochrome TIFF as input.\n\
                    Processing /survey/scans/b.tif\n\
                    * (\"scans/b.tif\", 0, Some(\"0003\"))\n\
                    Done\n";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
    assert_eq!(results.len(), 3);
    assert_eq!(
        scanner.corrected_pages(),
        vec![(PathBuf::from("/survey/scans/b.tif"), 0)]
    );
}

#[test]
fn batch_continues_after_missing_file() {
    let scanner = TestScanner::new().with_pages("/s/a.tif", [Some("9")]);
    let config = ScanConfig::default().with_survey_dir("/s");
    let files = vec![PathBuf::from("/s/missing.tif"), PathBuf::from("/s/a.tif")];

    let mut out = Vec::new();
    let results = find_global_ids(&files, &scanner, &scanner, &config, &mut out).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].global_id.as_deref(), Some("9"));
    assert!(String::from_utf8(out).unwrap().ends_with("Done\n"));
}
