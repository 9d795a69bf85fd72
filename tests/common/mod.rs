#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::oneshot;

use timetable_viewer::core::api_client::{TimetableApi, UploadFile};
use timetable_viewer::core::export::Notifier;
use timetable_viewer::model::course_entry::CourseEntry;
use timetable_viewer::model::section::Section;
use timetable_viewer::model::timetable::Timetable;
use timetable_viewer::{Result, TimetableError};

/// A timetable shaped like the backend's output, with single-letter break markers in slot 6.
pub fn timetable_fixture(section: &Section) -> Timetable {
    serde_json::from_value(json!({
        "section": section,
        "time_slots": [1, 2, 3, 4, 5, 6, 7, 8],
        "max_slot": 8,
        "slot_times": {
            "1": "0800 - 0850", "2": "0900 - 0950", "3": "1000 - 1050", "4": "1100 - 1150",
            "5": "1200 - 1250", "6": "1300 - 1400", "7": "1400 - 1450", "8": "1500 - 1550"
        },
        "timetable": {
            "MON": {
                "1": {
                    "code": "FSPT0024", "name": "PHYSICS",
                    "location": "LAB 2", "lecturer": "DR LIM"
                },
                "2": {
                    "code": "FSPT0024", "name": "PHYSICS",
                    "location": "LAB 2", "lecturer": "DR LIM"
                },
                "6": {"code": "B", "name": "B", "location": "", "lecturer": ""}
            },
            "TUE": {
                "3": {
                    "code": "FSMT0014", "name": "CALCULUS",
                    "location": "DK 1", "lecturer": "MR SABRUN"
                },
                "6": {"code": "R", "name": "R", "location": "", "lecturer": ""}
            },
            "WED": {"6": {"code": "E", "name": "E", "location": "", "lecturer": ""}, "7": null},
            "THU": {"6": {"code": "A", "name": "A", "location": "", "lecturer": ""}},
            "FRI": {
                "6": {"code": "K", "name": "K", "location": "", "lecturer": ""},
                "8": {
                    "code": "FSCH0034", "name": "CHEMISTRY <LAB>",
                    "location": "LAB 5", "lecturer": "DR O'HARA"
                }
            }
        }
    }))
    .expect("valid fixture")
}

pub fn course(name: &str, lecturer: &str, shared: &[i64]) -> CourseEntry {
    CourseEntry {
        course_name: name.to_string(),
        lecturer_name: lecturer.to_string(),
        shared_sections: shared.iter().copied().map(Section::from).collect(),
    }
}

/// In-memory backend. Requests for a gated section wait until the gate is released.
#[derive(Default)]
pub struct MockApi {
    pub sections: Vec<Section>,
    pub courses: HashMap<String, Vec<CourseEntry>>,
    pub failing: Vec<String>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    pub calls: AtomicUsize,
}

impl MockApi {
    pub fn new(sections: &[i64]) -> Self {
        MockApi {
            sections: sections.iter().copied().map(Section::from).collect(),
            ..MockApi::default()
        }
    }

    /// Holds requests for `section` until the returned sender fires.
    pub fn gate(&self, section: &Section) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(section.to_string(), rx);
        tx
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, section: &Section) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().remove(&section.to_string());
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.failing.contains(&section.to_string()) {
            return Err(TimetableError::api(404, format!("Section {} not found", section)));
        }
        Ok(())
    }
}

#[async_trait]
impl TimetableApi for MockApi {
    async fn sections(&self) -> Result<Vec<Section>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.sections.clone())
    }

    async fn shared_lecturers(&self, section: &Section) -> Result<Vec<CourseEntry>> {
        self.enter(section).await?;
        Ok(self
            .courses
            .get(&section.to_string())
            .cloned()
            .unwrap_or_default())
    }

    async fn timetable(&self, section: &Section) -> Result<Timetable> {
        self.enter(section).await?;
        Ok(timetable_fixture(section))
    }

    async fn upload(&self, file: UploadFile) -> Result<Timetable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if file.bytes.is_empty() {
            return Err(TimetableError::api(500, "Could not find required tables in PDF"));
        }
        Ok(timetable_fixture(&Section::from("custom")))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
