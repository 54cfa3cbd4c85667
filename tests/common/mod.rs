#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use folio_layout::SAMPLE_SCRIPT_NAME;
use folio::{
    DocumentContent, DocumentSource, PlainInline, PrintOptions, RenderSession, Script,
    SourceDocument, TypesetError, Typesetter,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Geometry for the fixture document: empty title and contents sections, then
/// 1000px and 2000px of content, with one anchor per target.
pub fn fixture_geometry() -> Value {
    json!({
        "sections": [
            { "index": 0, "pixelHeight": 0.0, "pixelTop": 0.0 },
            { "index": 1, "pixelHeight": 0.0, "pixelTop": 0.0 },
            { "index": 2, "pixelHeight": 1000.0, "pixelTop": 0.0 },
            { "index": 3, "pixelHeight": 2000.0, "pixelTop": 1000.0 }
        ],
        "anchors": [
            { "id": "theory", "sectionIndex": 2, "offsetWithinSection": 0.0 },
            { "id": "premise", "sectionIndex": 2, "offsetWithinSection": 250.0 },
            { "id": "practice", "sectionIndex": 3, "offsetWithinSection": 0.0 },
            { "id": "late", "sectionIndex": 3, "offsetWithinSection": 1700.0 }
        ],
        "missing": []
    })
}

pub fn fixture_document() -> SourceDocument {
    let content = DocumentContent::from_json(fixtures::CONTENT_JSON).unwrap();
    DocumentSource::new(Arc::new(PlainInline))
        .build(&content)
        .unwrap()
}

/// What the fake typesetter does on each call.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Artifact returned by each print, in order. The last one repeats.
    pub artifacts: Vec<Vec<u8>>,
    /// Answer to the sampling script; `None` makes it throw.
    pub geometry: Option<Value>,
    pub fail_open: bool,
    /// 1-based pass whose load fails.
    pub fail_load_on_pass: Option<usize>,
    /// 1-based pass whose print fails.
    pub fail_print_on_pass: Option<usize>,
    /// 1-based pass whose print never completes.
    pub hang_print_on_pass: Option<usize>,
    pub fail_prepare_scripts: bool,
    /// Closing the context never completes.
    pub hang_close: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            artifacts: vec![fixtures::pdf_with_pages(8), fixtures::pdf_with_pages(8)],
            geometry: Some(fixture_geometry()),
            fail_open: false,
            fail_load_on_pass: None,
            fail_print_on_pass: None,
            hang_print_on_pass: None,
            fail_prepare_scripts: false,
            hang_close: false,
        }
    }
}

/// Everything the fake typesetter observed.
#[derive(Debug, Default)]
pub struct Recorder {
    pub opened: usize,
    pub closed: usize,
    pub loaded: Vec<String>,
    pub scripts: Vec<&'static str>,
    pub prints: usize,
}

#[derive(Debug, Clone)]
pub struct FakeTypesetter {
    scenario: Arc<Scenario>,
    pub recorder: Arc<Mutex<Recorder>>,
}

impl FakeTypesetter {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario: Arc::new(scenario),
            recorder: Arc::new(Mutex::new(Recorder::default())),
        }
    }

    pub fn opened(&self) -> usize {
        self.recorder.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.recorder.lock().unwrap().closed
    }

    pub fn loaded(&self) -> Vec<String> {
        self.recorder.lock().unwrap().loaded.clone()
    }

    pub fn scripts(&self) -> Vec<&'static str> {
        self.recorder.lock().unwrap().scripts.clone()
    }
}

#[async_trait]
impl Typesetter for FakeTypesetter {
    async fn open(&self) -> Result<Box<dyn RenderSession>, TypesetError> {
        if self.scenario.fail_open {
            return Err(TypesetError::Unavailable("no browser".to_string()));
        }
        self.recorder.lock().unwrap().opened += 1;
        Ok(Box::new(FakeSession {
            scenario: Arc::clone(&self.scenario),
            recorder: Arc::clone(&self.recorder),
            pass: 0,
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

struct FakeSession {
    scenario: Arc<Scenario>,
    recorder: Arc<Mutex<Recorder>>,
    pass: usize,
}

#[async_trait]
impl RenderSession for FakeSession {
    async fn load_html(&mut self, html: &str) -> Result<(), TypesetError> {
        self.pass += 1;
        if self.scenario.fail_load_on_pass == Some(self.pass) {
            return Err(TypesetError::Load("navigation failed".to_string()));
        }
        self.recorder.lock().unwrap().loaded.push(html.to_string());
        Ok(())
    }

    async fn evaluate(&mut self, script: &Script) -> Result<Value, TypesetError> {
        self.recorder.lock().unwrap().scripts.push(script.name);
        if script.name == SAMPLE_SCRIPT_NAME {
            return self.scenario.geometry.clone().ok_or(TypesetError::Script {
                name: script.name,
                message: "ReferenceError: layout is not defined".to_string(),
            });
        }
        if self.scenario.fail_prepare_scripts {
            return Err(TypesetError::Script {
                name: script.name,
                message: "boom".to_string(),
            });
        }
        Ok(json!({ "faces": 0, "failed": 0, "available": false, "total": 0, "rendered": 0 }))
    }

    async fn print_pdf(&mut self, _options: &PrintOptions) -> Result<Vec<u8>, TypesetError> {
        if self.scenario.hang_print_on_pass == Some(self.pass) {
            std::future::pending::<()>().await;
        }
        if self.scenario.fail_print_on_pass == Some(self.pass) {
            return Err(TypesetError::Print("printToPDF failed".to_string()));
        }
        let mut recorder = self.recorder.lock().unwrap();
        let index = recorder.prints.min(self.scenario.artifacts.len().saturating_sub(1));
        recorder.prints += 1;
        Ok(self.scenario.artifacts.get(index).cloned().unwrap_or_default())
    }

    async fn close(self: Box<Self>) -> Result<(), TypesetError> {
        if self.scenario.hang_close {
            std::future::pending::<()>().await;
        }
        self.recorder.lock().unwrap().closed += 1;
        Ok(())
    }
}

/// Text of the placeholder for `target` in rendered `html`.
pub fn placeholder_text(html: &str, target: &str) -> Option<String> {
    let marker = format!("data-toc-target=\"{}\">", target);
    let start = html.find(&marker)? + marker.len();
    let end = html[start..].find("</span>")? + start;
    Some(html[start..end].to_string())
}
