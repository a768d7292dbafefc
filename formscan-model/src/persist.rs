use serde::{Deserialize, Serialize};

use crate::{ModelError, QObject, Questionnaire};

#[derive(Serialize)]
struct QuestionnaireRecordRef<'a> {
    survey: Option<&'a str>,
    page_count: u32,
    qobjects: &'a [QObject],
}

#[derive(Deserialize)]
struct QuestionnaireRecord {
    survey: Option<String>,
    page_count: u32,
    qobjects: Vec<QObject>,
}

impl Questionnaire {
    /// Serialize the structural definition. Listeners are not part of it.
    pub fn to_json(&self) -> Result<String, ModelError> {
        let record = QuestionnaireRecordRef {
            survey: self.survey(),
            page_count: self.page_count(),
            qobjects: self.qobjects(),
        };
        Ok(serde_json::to_string_pretty(&record)?)
    }

    /// Rebuild a questionnaire from [`Questionnaire::to_json`] output.
    ///
    /// Every QObject is re-added under its stored id and every box is re-added in
    /// order, so a stored tree that breaks the identifier rules is rejected.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let record: QuestionnaireRecord = serde_json::from_str(json)?;

        let mut questionnaire = match record.survey {
            Some(survey) => Questionnaire::new().with_survey(survey),
            None => Questionnaire::new(),
        };
        for stored in record.qobjects {
            let (id, kind, boxes) = stored.into_parts();
            questionnaire.add_qobject(QObject::new(kind), Some(id))?;
            for scan_box in boxes {
                let stored = scan_box.id();
                let allocated = questionnaire.add_box(id, scan_box)?;
                if allocated != stored {
                    return Err(ModelError::BoxIdMismatch { stored, allocated });
                }
            }
        }
        questionnaire.set_page_count(record.page_count.max(questionnaire.page_count()));
        Ok(questionnaire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QObjectId, ScanBox};

    fn sample() -> Questionnaire {
        let mut questionnaire = Questionnaire::new().with_survey("Lecture evaluation");
        questionnaire.add_qobject(QObject::head("Lecture"), None).unwrap();
        let id = questionnaire
            .add_qobject(QObject::single_choice("Year?").on_page(1), None)
            .unwrap();
        for (i, label) in ["n/a", "first", "second"].into_iter().enumerate() {
            let x = 30.0 + 25.0 * i as f64;
            questionnaire
                .add_box(id, ScanBox::checkbox(x, 40.0, 3.5, 3.5).with_text(label).on_page(1))
                .unwrap();
        }
        questionnaire
    }

    #[test]
    fn restores_identical_structure() {
        let original = sample();
        let restored = Questionnaire::from_json(&original.to_json().unwrap()).unwrap();

        assert_eq!(restored.survey(), Some("Lecture evaluation"));
        assert_eq!(restored.qobjects(), original.qobjects());
        assert_eq!(restored.last_id(), QObjectId::new(1, 1));
        assert_eq!(restored.page_count(), 1);
        assert_eq!(restored.fingerprint(), original.fingerprint());
    }

    #[test]
    fn restored_questionnaire_keeps_allocating() {
        let mut restored = Questionnaire::from_json(&sample().to_json().unwrap()).unwrap();
        let id = restored.add_qobject(QObject::choice("More?"), None).unwrap();
        assert_eq!(id, QObjectId::new(1, 2));

        let box_id = restored
            .add_box(QObjectId::new(1, 1), ScanBox::checkbox(105.0, 40.0, 3.5, 3.5))
            .unwrap();
        assert_eq!(box_id.value, 3);
    }

    #[test]
    fn rejects_out_of_order_ids() {
        let mut record: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        record["qobjects"][1]["id"] = serde_json::json!({ "major": 0, "minor": 4 });

        let result = Questionnaire::from_json(&record.to_string());
        assert!(matches!(result, Err(ModelError::InvalidIdOrdering { .. })));
    }

    #[test]
    fn rejects_box_gaps() {
        let mut record: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        record["qobjects"][1]["boxes"][2]["id"]["value"] = serde_json::json!(5);

        let result = Questionnaire::from_json(&record.to_string());
        assert!(matches!(result, Err(ModelError::BoxIdMismatch { .. })));
    }

    #[test]
    fn rejects_garbage() {
        let result = Questionnaire::from_json("{ not json");
        assert!(matches!(result, Err(ModelError::Persist(_))));
    }
}
