// Copyright 2025 The cardbox authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::html::push_html;

/// Render Markdown to HTML.
pub fn markdown_to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(text, options);
    let mut html = String::new();
    push_html(&mut html, parser);
    html
}

/// Render Markdown to HTML, dropping the wrapping paragraph tags so the
/// result can be embedded inline.
pub fn markdown_to_html_inline(text: &str) -> String {
    let html = markdown_to_html(text);
    let html = html.trim();
    if html.matches("<p>").count() == 1 {
        if let Some(inner) = html.strip_prefix("<p>").and_then(|h| h.strip_suffix("</p>")) {
            return inner.to_string();
        }
    }
    html.to_string()
}
