// src/formatter/html.rs
//! HTML timeline formatter
//!
//! Produces one standalone page: styles, a search box with category
//! filters, one timeline entry per record and the script that drives the
//! filters and the snapshot panels. The only external reference is the
//! logo image.

use crate::formatter::escape::escape_html;
use crate::formatter::variant::RenderingVariant;
use crate::formatter::{Formatter, OutputFormat};
use crate::recording::introspect::PropertyView;
use crate::recording::record::{Recordable, SharedRecord};
use crate::utils::errors::{ReporterError, Result};
use std::fmt::Write as _;
use tracing::debug;

/// Logo referenced from the page header, relative to the report file
pub const LOGO_PATH: &str = "../images/htmlunit.png";

/// Placeholder shown when there is nothing to render
pub const EMPTY_TIMELINE: &str = "No logs found to display.";

/// Categories offered as filter checkboxes, matching the `data-type` tags
const FILTER_CATEGORIES: [(&str, &str); 5] = [
    ("info", "Info"),
    ("warning", "Warning"),
    ("error", "Error"),
    ("debug", "Debug"),
    ("success", "Success"),
];

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Log Timeline</title>
    <style>
        body { font-family: sans-serif; margin: 0; padding: 0; background-color: #f4f7f6; color: #333; display: flex; flex-direction: column; min-height: 100vh; }
        .navbar { background-color: #333; padding: 10px 20px; display: flex; align-items: center; color: #fff; box-shadow: 0 2px 5px rgba(0,0,0,0.2); }
        .navbar .logo-link { display: flex; align-items: center; text-decoration: none; color: inherit; }
        .navbar img { height: 40px; margin-right: 15px; vertical-align: middle; }
        .navbar h1 { font-size: 1.4em; margin: 0; font-weight: 500; }
        main { flex-grow: 1; padding: 20px; }
        #controls { margin-bottom: 30px; padding: 15px; background-color: #fff; border-radius: 8px; box-shadow: 0 2px 5px rgba(0,0,0,0.1); display: flex; flex-wrap: wrap; gap: 15px; align-items: center; }
        #controls label { font-weight: bold; margin-right: 5px; }
        #controls input[type="text"] { padding: 8px 12px; border: 1px solid #ccc; border-radius: 4px; font-size: 1em; flex-grow: 1; min-width: 200px; }
        #filter-controls { display: flex; gap: 10px; align-items: center; flex-wrap: wrap; }
        #filter-controls label { font-weight: normal; margin-right: 0; display: flex; align-items: center; cursor: pointer; }
        #filter-controls input[type="checkbox"] { margin-right: 5px; }
        #timeline-container { position: relative; padding-left: 40px; margin-left: 20px; }
        #timeline-container::before { content: ''; position: absolute; left: 20px; top: 0; bottom: 0; width: 4px; background-color: #dcdcdc; border-radius: 2px; }
        .log-entry { position: relative; margin-bottom: 25px; padding: 15px; background-color: #ffffff; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,0.08); border-left: 5px solid #ccc; transition: all 0.3s ease; }
        .log-entry::before { content: ''; position: absolute; left: -30px; top: 18px; width: 16px; height: 16px; border-radius: 50%; background-color: #ccc; border: 3px solid #f4f7f6; z-index: 1; }
        .timestamp { display: block; font-weight: bold; color: #555; margin-bottom: 8px; font-size: 0.9em; }
        .log-message { color: #333; line-height: 1.5; word-break: break-word; }
        .log-entry[data-type="info"] { border-left-color: #3498db; }
        .log-entry[data-type="info"]::before { background-color: #3498db; }
        .log-entry[data-type="warning"] { border-left-color: #f39c12; background-color: #fffaf0; }
        .log-entry[data-type="warning"]::before { background-color: #f39c12; }
        .log-entry[data-type="error"] { border-left-color: #e74c3c; background-color: #fff2f2; }
        .log-entry[data-type="error"]::before { background-color: #e74c3c; }
        .log-entry[data-type="error"] .log-message { font-weight: 500; }
        .log-entry[data-type="debug"] { border-left-color: #9b59b6; opacity: 0.85; }
        .log-entry[data-type="debug"]::before { background-color: #9b59b6; }
        .log-entry[data-type="debug"] .log-message { font-style: italic; color: #666; }
        .log-entry[data-type="success"] { border-left-color: #2ecc71; }
        .log-entry[data-type="success"]::before { background-color: #2ecc71; }
        .log-entry.hidden { display: none; }
        .snapshot-panel pre { background-color: #f8f8f8; padding: 10px; border-radius: 4px; overflow-x: auto; }
        .footer { background-color: #e9ecef; color: #6c757d; text-align: center; padding: 15px 20px; margin-top: 30px; border-top: 1px solid #dee2e6; font-size: 0.9em; }
        .footer p { margin: 5px 0; }
    </style>
</head>
"#;

const FOOTER: &str = r#"    <!-- Footer -->
    <footer class="footer">
        <p>Generated by the HtmlUnit Automated Test Recorder.</p>
    </footer>

"#;

const SCRIPT: &str = r#"    <script>
        const searchInput = document.getElementById('searchInput');
        const filterCheckboxes = document.querySelectorAll('.filter-checkbox');
        const timelineContainer = document.getElementById('timeline-container');

        function applyFiltersAndSearch() {
            const searchTerm = searchInput.value.toLowerCase().trim();
            const logEntries = timelineContainer.querySelectorAll('.log-entry');

            const checkedFilters = new Set();
            filterCheckboxes.forEach(checkbox => {
                if (checkbox.checked) { checkedFilters.add(checkbox.value); }
            });

            logEntries.forEach(entry => {
                const entryType = entry.getAttribute('data-type');
                const entryTimestamp = entry.querySelector('.timestamp')?.textContent.toLowerCase() ?? '';
                const entryMessage = entry.querySelector('.log-message')?.textContent.toLowerCase() ?? '';
                const entryText = `${entryTimestamp} ${entryMessage}`;
                const matchesSearch = !searchTerm || entryText.includes(searchTerm);
                const matchesFilter = !checkedFilters.size || checkedFilters.has(entryType);

                if (matchesSearch && matchesFilter) {
                    entry.classList.remove('hidden');
                } else {
                    entry.classList.add('hidden');
                }
            });
        }

        function toggleSnapshotPanel(panelId, button) {
            const panel = document.getElementById(panelId);
            if (!panel) { return; }
            const entry = panel.closest('.snapshot-entry');
            const opening = panel.style.display === 'none';

            if (entry) {
                entry.querySelectorAll('.snapshot-panel').forEach(other => { other.style.display = 'none'; });
                entry.querySelectorAll('button').forEach(other => {
                    other.textContent = other.textContent.replace('Hide', 'View');
                });
            }
            if (opening) {
                panel.style.display = 'block';
                button.textContent = button.textContent.replace('View', 'Hide');
            }
        }

        searchInput.addEventListener('input', applyFiltersAndSearch);
        filterCheckboxes.forEach(checkbox => {
            checkbox.addEventListener('change', applyFiltersAndSearch);
        });
        document.addEventListener('DOMContentLoaded', applyFiltersAndSearch);
    </script>
</body>
</html>
"#;

/// HTML formatter
#[derive(Debug, Clone, Default)]
pub struct HtmlFormatter;

impl HtmlFormatter {
    pub fn new() -> Self {
        Self
    }

    fn append_header(html: &mut String) {
        html.push_str("<body>\n\n");
        html.push_str("    <!-- Header -->\n");
        html.push_str("    <div class=\"navbar\">\n");
        html.push_str(
            "        <a href=\"https://www.htmlunit.org/\" class=\"logo-link\" target=\"_blank\" rel=\"noopener noreferrer\">\n",
        );
        let _ = writeln!(html, "            <img src=\"{LOGO_PATH}\" alt=\"HtmlUnit Logo\">");
        html.push_str("            <h1>HtmlUnit Automated Test Recorder</h1>\n");
        html.push_str("        </a>\n");
        html.push_str("    </div>\n\n");
    }

    fn append_main_start(html: &mut String, session_id: &str) {
        html.push_str("    <!-- Main Content -->\n");
        html.push_str("    <main>\n");
        html.push_str("        <h1>Program Log Timeline</h1>\n\n");
        html.push_str("        <div id=\"controls\">\n");
        html.push_str("            <label for=\"searchInput\">Search:</label>\n");
        html.push_str(
            "            <input type=\"text\" id=\"searchInput\" placeholder=\"Search in logs...\">\n\n",
        );
        html.push_str("            <div id=\"filter-controls\">\n");
        html.push_str("                <span>Filter:</span>\n");
        for (value, label) in FILTER_CATEGORIES {
            let _ = writeln!(
                html,
                "                <label><input type=\"checkbox\" class=\"filter-checkbox\" value=\"{value}\" checked> {label}</label>"
            );
        }
        html.push_str("            </div>\n");
        html.push_str("        </div>\n\n");
        // "--" would end the comment early
        let _ = writeln!(
            html,
            "        <!-- Recorder UUID: {} -->\n",
            escape_html(&session_id.replace("--", "- -"))
        );
        html.push_str("        <div id=\"timeline-container\">\n");
    }

    fn append_main_end(html: &mut String) {
        html.push_str("        </div> <!-- #timeline-container -->\n");
        html.push_str("    </main>\n\n");
    }

    fn append_entry(html: &mut String, record: &dyn Recordable) -> Result<()> {
        // No fallback to Info: a kindless record fails the whole page
        let kind = record
            .kind()
            .ok_or_else(|| ReporterError::UnmappedRecordKind {
                kind: "<none>".to_string(),
                class_name: record.class_name().to_string(),
                method_name: record.method_name().to_string(),
            })?;

        RenderingVariant::for_kind(kind).render(html, &PropertyView::of(record));
        Ok(())
    }

    fn render(
        session_id: &str,
        count: usize,
        entries: impl FnOnce(&mut String) -> Result<()>,
    ) -> Result<String> {
        let mut html = String::with_capacity(HEAD.len() + SCRIPT.len() + count * 512);
        html.push_str(HEAD);
        Self::append_header(&mut html);
        Self::append_main_start(&mut html, session_id);

        if count == 0 {
            let _ = writeln!(html, "            <p>{EMPTY_TIMELINE}</p>");
        } else {
            entries(&mut html)?;
        }

        Self::append_main_end(&mut html);
        html.push_str(FOOTER);
        html.push_str(SCRIPT);
        Ok(html)
    }
}

impl Formatter for HtmlFormatter {
    fn format_records(&self, records: &[SharedRecord], session_id: &str) -> Result<String> {
        debug!("Formatting {} records as HTML", records.len());
        Self::render(session_id, records.len(), |html| {
            for record in records {
                Self::append_entry(html, record.as_ref())?;
            }
            Ok(())
        })
    }

    /// Same page as a one-element list
    fn format_record(&self, record: &dyn Recordable, session_id: &str) -> Result<String> {
        Self::render(session_id, 1, |html| Self::append_entry(html, record))
    }

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}
