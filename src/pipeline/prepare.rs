//! Readiness steps run before the live document is measured or printed.
//!
//! Both steps are tolerant: a failing script is logged and the run continues with
//! whatever state the document is in.

use folio_traits::{RenderSession, Script};
use folio_types::markers::{MATH_CLASS, MATH_DISPLAY_ATTR, MATH_TEX_ATTR};
use log::{debug, warn};
use serde::Deserialize;
use std::time::Duration;

pub const FONTS_SCRIPT_NAME: &str = "await-fonts";
pub const MATH_SCRIPT_NAME: &str = "typeset-math";

const FONTS_SCRIPT: &str = r#"(async () => {
  const faces = document.fonts ? Array.from(document.fonts) : [];
  let failed = 0;
  await Promise.all(faces.map((face) => face.load().catch(() => { failed += 1; })));
  if (document.fonts) { await document.fonts.ready; }
  return { faces: faces.length, failed };
})()"#;

const MATH_SCRIPT_TEMPLATE: &str = r#"(() => {
  const nodes = Array.from(document.querySelectorAll("." + __MATH_CLASS__ + "[" + __TEX_ATTR__ + "]"));
  if (typeof katex === "undefined") {
    return { available: false, total: nodes.length, rendered: 0, failed: 0 };
  }
  let rendered = 0;
  let failed = 0;
  for (const el of nodes) {
    try {
      katex.render(el.getAttribute(__TEX_ATTR__), el, {
        displayMode: el.getAttribute(__DISPLAY_ATTR__) === "true",
        throwOnError: true,
      });
      rendered += 1;
    } catch (e) {
      failed += 1;
    }
  }
  return { available: true, total: nodes.length, rendered, failed };
})()"#;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FontReadiness {
    pub faces: usize,
    pub failed: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MathReadiness {
    pub available: bool,
    pub total: usize,
    pub rendered: usize,
    pub failed: usize,
}

pub fn fonts_script() -> Script {
    Script::new(FONTS_SCRIPT_NAME, FONTS_SCRIPT)
}

pub fn math_script() -> Script {
    let quote = |s: &str| format!("\"{}\"", s);
    let source = MATH_SCRIPT_TEMPLATE
        .replace("__MATH_CLASS__", &quote(MATH_CLASS))
        .replace("__TEX_ATTR__", &quote(MATH_TEX_ATTR))
        .replace("__DISPLAY_ATTR__", &quote(MATH_DISPLAY_ATTR));
    Script::new(MATH_SCRIPT_NAME, source)
}

/// Waits for fonts, typesets math, and lets layout settle after each.
pub async fn prepare(session: &mut dyn RenderSession, font_settle: Duration, math_settle: Duration) {
    match session.evaluate(&fonts_script()).await {
        Ok(value) => {
            let fonts: FontReadiness = serde_json::from_value(value).unwrap_or_default();
            if fonts.failed > 0 {
                warn!("[PREPARE] {} of {} font faces failed to load.", fonts.failed, fonts.faces);
            } else {
                debug!("[PREPARE] {} font faces ready.", fonts.faces);
            }
        }
        Err(e) => warn!("[PREPARE] Font readiness check failed: {}", e),
    }
    settle(font_settle).await;

    match session.evaluate(&math_script()).await {
        Ok(value) => {
            let math: MathReadiness = serde_json::from_value(value).unwrap_or_default();
            if !math.available && math.total > 0 {
                warn!(
                    "[PREPARE] {} math elements but no typesetter loaded; leaving TeX source.",
                    math.total
                );
            } else if math.failed > 0 {
                warn!("[PREPARE] {} of {} math elements failed to typeset.", math.failed, math.total);
            } else {
                debug!("[PREPARE] Typeset {} math elements.", math.rendered);
            }
        }
        Err(e) => warn!("[PREPARE] Math typesetting failed: {}", e),
    }
    settle(math_settle).await;
}

async fn settle(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
