// src/export/html.rs
//! Standalone HTML document: CDN styling, header card, one card per section

use quick_xml::escape::escape;

use super::{ExportInput, HeaderInfo};
use crate::types::cv_data::{CvSection, Language};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";
const GOOGLE_FONTS_CSS: &str =
    "https://fonts.googleapis.com/css2?family=Cairo:wght@400;700&family=Poppins:wght@400;600&display=swap";

const PAGE_STYLE: &str = "body { font-family: 'Poppins', sans-serif; background-color: #f0f9ff; }
      .font-cairo { font-family: 'Cairo', sans-serif; }
      .section-card { page-break-inside: avoid; }";

pub fn html_file_name(header: &HeaderInfo) -> String {
    format!("{}-cv.html", header.file_stem())
}

fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

fn push_items(out: &mut String, items: &[String]) {
    for item in items {
        out.push_str(&format!("          <li>{}</li>\n", escape(item.as_str())));
    }
}

/// One `<section>` per CV section, both languages present, the inactive one hidden
pub fn render_sections(sections: &[CvSection], language: Language) -> String {
    let mut out = String::new();

    for section in sections {
        let icon = escape(section.icon.as_str());
        out.push_str(&format!(
            r#"    <section id="{}" class="section-card mb-8 p-6 bg-white/80 border border-white/20 rounded-2xl shadow-md">
      <div lang="en" style="display: {}">
        <h2 class="text-3xl font-bold text-blue-900 border-b-4 border-blue-500 pb-2 mb-4 flex items-center"><i class="{} mr-3"></i>{}</h2>
"#,
            escape(section.id.as_str()),
            display(language == Language::En),
            icon,
            escape(section.en_title.as_str())
        ));
        out.push_str("        <ul class=\"list-disc list-inside space-y-2 text-gray-800\">\n");
        push_items(&mut out, &section.en_items);
        out.push_str("        </ul>\n      </div>\n");

        out.push_str(&format!(
            r#"      <div lang="ar" class="font-cairo text-right" style="display: {}">
        <h2 class="text-3xl font-bold text-blue-900 border-b-4 border-blue-500 pb-2 mb-4 flex items-center justify-end">{}<i class="{} ml-3"></i></h2>
"#,
            display(language == Language::Ar),
            escape(section.ar_title.as_str()),
            icon
        ));
        out.push_str(
            "        <ul class=\"list-disc list-inside space-y-2 text-gray-800\" style=\"direction: rtl\">\n",
        );
        push_items(&mut out, &section.ar_items);
        out.push_str("        </ul>\n      </div>\n    </section>\n");
    }

    out
}

fn render_header(header: &HeaderInfo) -> String {
    let language = header.language;
    let (margin_left, margin_right) = if language.is_rtl() {
        ("0", "20px")
    } else {
        ("20px", "0")
    };

    format!(
        r#"  <header style="padding: 20px; display: flex; align-items: center; font-family: {font}; direction: {dir}; background-color: white; border-radius: 1rem; margin-bottom: 2rem; box-shadow: 0 4px 6px -1px rgb(0 0 0 / 0.1);">
    <div>
      <img src="{src}" alt="{name}" style="width: 80px; height: 80px; border-radius: 50%; object-fit: cover; border: 4px solid #60a5fa;"/>
    </div>
    <div style="margin-left: {margin_left}; margin-right: {margin_right};">
      <h1 style="font-size: 24px; font-weight: bold; color: #1e3a8a; margin: 0;">{name}</h1>
      <p style="font-size: 14px; color: #374151; margin: 5px 0 0 0;">{title}</p>
    </div>
  </header>
"#,
        font = language.font_family(),
        dir = language.dir(),
        src = escape(header.picture_src().as_str()),
        name = escape(header.name.as_str()),
        title = escape(header.title.as_str()),
        margin_left = margin_left,
        margin_right = margin_right,
    )
}

pub fn render_html(input: &ExportInput) -> String {
    let header = &input.header;
    let language = header.language;

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}" dir="{dir}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{name} - CV</title>
  <script src="{tailwind}"></script>
  <link rel="stylesheet" href="{font_awesome}">
  <link href="{fonts}" rel="stylesheet">
  <style>
      {style}
  </style>
</head>
<body class="p-8">
{header}  <main>
{sections}  </main>
</body>
</html>
"#,
        lang = language.code(),
        dir = language.dir(),
        name = escape(header.name.as_str()),
        tailwind = TAILWIND_CDN,
        font_awesome = FONT_AWESOME_CSS,
        fonts = escape(GOOGLE_FONTS_CSS),
        style = PAGE_STYLE,
        header = render_header(header),
        sections = render_sections(input.sections(), language),
    )
}
