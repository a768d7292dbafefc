//! Integration tests for building and searching the element tree

use formscan_model::{Answer, BoxId, ElementId, QObject, QObjectId, Questionnaire, ScanBox, Sheet};

/// Build a questionnaire from a compact script: `H` adds a head, a digit adds a
/// choice with that many boxes.
fn build(script: &str) -> (Questionnaire, Vec<ElementId>) {
    let mut questionnaire = Questionnaire::new();
    let mut allocated = Vec::new();
    for step in script.chars() {
        if step == 'H' {
            let id = questionnaire.add_qobject(QObject::head("Section"), None).unwrap();
            allocated.push(id.into());
            continue;
        }
        let count = step.to_digit(10).unwrap();
        let id = questionnaire.add_qobject(QObject::choice("Pick"), None).unwrap();
        allocated.push(id.into());
        for i in 0..count {
            let scan_box = ScanBox::checkbox(10.0 * f64::from(i), 5.0, 3.5, 3.5);
            allocated.push(questionnaire.add_box(id, scan_box).unwrap().into());
        }
    }
    (questionnaire, allocated)
}

#[test]
fn identifiers_are_strictly_increasing_and_unique() {
    for script in ["", "3", "H", "2H13H", "HHH", "04H5H0H22"] {
        let (_, allocated) = build(script);
        assert!(
            allocated.windows(2).all(|pair| pair[0] < pair[1]),
            "not increasing for {script:?}: {allocated:?}"
        );
    }
}

#[test]
fn every_allocated_id_is_found() {
    let (questionnaire, allocated) = build("2H13H0H4");
    for id in &allocated {
        let element = questionnaire
            .find_object(*id)
            .unwrap_or_else(|| panic!("{id} not found"));
        assert_eq!(element.id(), *id);
    }
}

#[test]
fn unknown_ids_are_not_found() {
    let (questionnaire, _) = build("2H13");
    for id in [
        ElementId::from((0, 0)),
        ElementId::from((0, 2)),
        ElementId::from((0, 1, 2)),
        ElementId::from((1, 1, 1)),
        ElementId::from((1, 3)),
        ElementId::from((2, 0)),
    ] {
        assert!(questionnaire.find_object(id).is_none(), "{id} should be absent");
    }
}

#[test]
fn boxes_inherit_question_identifier() {
    let (questionnaire, _) = build("H3");
    let question = questionnaire.qobject(QObjectId::new(1, 1)).unwrap();
    let ids: Vec<BoxId> = question.boxes().iter().map(ScanBox::id).collect();
    assert_eq!(
        ids,
        vec![BoxId::new(1, 1, 0), BoxId::new(1, 1, 1), BoxId::new(1, 1, 2)]
    );
}

#[test]
fn one_tree_serves_many_sheets_in_parallel() {
    let (questionnaire, _) = build("H3");
    let id = QObjectId::new(1, 1);

    let answers: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..3u32)
            .map(|marked| {
                let questionnaire = &questionnaire;
                scope.spawn(move || {
                    let mut sheet = Sheet::new();
                    questionnaire
                        .set_box_state(&mut sheet, id.child(marked), true)
                        .unwrap();
                    questionnaire.get_answer(&sheet, id).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(
        answers,
        vec![
            Answer::Choices(vec![0]),
            Answer::Choices(vec![1]),
            Answer::Choices(vec![2]),
        ]
    );
}
