//! End-to-end tests: markdown source → rendered pages

use folio_babel::{compile, precompile, CompileOptions, PipelineError, RenderOptions, Template};
use folio_core::{CompileError, DiagnosticKind, FrontmatterError, PagingOptions};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn markdown() -> CompileOptions {
    CompileOptions {
        format: "markdown".to_string(),
        ..CompileOptions::default()
    }
}

fn contents(options: &CompileOptions, source: &str) -> Vec<String> {
    compile(source, options)
        .expect("compile to succeed")
        .pages
        .into_iter()
        .map(|page| page.contents)
        .collect()
}

#[test]
fn splits_at_top_level_headings() {
    let compiled = compile("# Hello\n\n## World!\n\nHow are you?", &markdown()).unwrap();

    let names: Vec<_> = compiled.pages.iter().map(|p| p.filename.as_str()).collect();
    assert_eq!(names, vec!["page.md", "page1.md"]);
    assert_eq!(compiled.pages[0].contents, "# Hello");
    assert_eq!(compiled.pages[1].contents, "## World!\n\nHow are you?");
}

#[test]
fn deeper_headings_stay_on_their_page() {
    assert_eq!(
        contents(&markdown(), "# Hello\n\n## World!\n\n### How are you?"),
        vec!["# Hello", "## World!\n\n### How are you?"]
    );
}

#[test]
fn front_matter_becomes_global_metadata() {
    let compiled = compile("---\ntitle: Hello\n---\n", &markdown()).unwrap();

    assert_eq!(compiled.pages.len(), 1);
    assert_eq!(compiled.collection.global_metadata["title"], "Hello");
    assert!(compiled.collection.pages[0].metadata.is_empty());
    assert_eq!(compiled.pages[0].metadata["title"], "Hello");
    assert_eq!(compiled.pages[0].contents, "");
}

#[test]
fn directive_is_hoisted_onto_its_page() {
    let compiled = compile("# Hello\n\n::title[Hi]\n\nHow are you?", &markdown()).unwrap();

    assert_eq!(compiled.pages.len(), 1);
    assert_eq!(compiled.collection.pages[0].metadata["title"], "Hi");
    assert_eq!(compiled.pages[0].contents, "# Hello\n\nHow are you?");
}

#[test]
fn page_metadata_overrides_front_matter() {
    let source = "---\ntitle: Site\nauthor: Ada\n---\n\n# One\n\n# Two\n\n::title[Second]\n";
    let compiled = compile(source, &markdown()).unwrap();

    assert_eq!(compiled.pages[0].metadata["title"], "Site");
    assert_eq!(compiled.pages[1].metadata["title"], "Second");
    assert_eq!(compiled.pages[1].metadata["author"], "Ada");
}

#[test]
fn orphan_directive_is_reported_and_dropped() {
    let compiled = compile("::title[Lost]\n\n# Hello\n", &markdown()).unwrap();

    let warnings: Vec<_> = compiled.diagnostics.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, DiagnosticKind::OrphanDirective);
    assert!(!compiled.collection.global_metadata.contains_key("title"));
    assert!(!compiled.pages[0].metadata.contains_key("title"));
    assert_eq!(compiled.pages[0].contents, "# Hello");
}

#[test]
fn text_directive_inside_paragraph() {
    let compiled = compile("# Hello\n\nWritten by :author[Ada].\n", &markdown()).unwrap();

    assert_eq!(compiled.pages[0].metadata["author"], "Ada");
    assert_eq!(compiled.pages[0].contents, "# Hello\n\nWritten by .");
}

#[test]
fn html_is_the_default_format() {
    let compiled = compile("# Hello", &CompileOptions::default()).unwrap();

    assert_eq!(compiled.pages[0].filename, "page.html");
    assert_eq!(compiled.pages[0].contents, "<h1>Hello</h1>");
}

#[test]
fn html_pages() {
    let html = contents(
        &CompileOptions::default(),
        "# Hello\n\n## World!\n\nHow are you?",
    );
    assert_eq!(html, vec!["<h1>Hello</h1>", "<h2>World!</h2>\n<p>How are you?</p>"]);
}

#[test]
fn html_document_pages() {
    let options = CompileOptions {
        format: "html-document".to_string(),
        ..CompileOptions::default()
    };
    let compiled = compile("# Hello", &options).unwrap();

    assert_eq!(compiled.pages[0].filename, "page.html");
    insta::assert_snapshot!(compiled.pages[0].contents, @r###"
    <!DOCTYPE html>
    <html lang="en">
    <head>
      <meta charset="UTF-8">
      <meta name="viewport" content="width=device-width, initial-scale=1.0">
      <meta name="generator" content="folio">
      <title>Hello</title>
    </head>
    <body>
    <h1>Hello</h1>
    </body>
    </html>
    "###);
}

#[test]
fn template_wraps_each_page() {
    let options = CompileOptions {
        render: RenderOptions {
            template: Some(Template::new("<main data-title=\"{{ title }}\">{{ contents }}</main>")),
            ..RenderOptions::default()
        },
        ..CompileOptions::default()
    };
    let html = contents(&options, "---\ntitle: Site\n---\n\n# One\n\n# Two\n");
    assert_eq!(
        html,
        vec![
            "<main data-title=\"Site\"><h1>One</h1></main>",
            "<main data-title=\"Site\"><h1>Two</h1></main>",
        ]
    );
}

#[rstest]
#[case(1, 2)]
#[case(2, 3)]
#[case(3, 4)]
fn depth_threshold_controls_page_count(#[case] max_depth: u64, #[case] expected: usize) {
    let options = CompileOptions {
        paging: PagingOptions::default().with_max_depth(max_depth),
        ..markdown()
    };
    let source = "# A\n\ntext\n\n## B\n\n### C\n\n# D\n\n#### E\n";
    assert_eq!(compile(source, &options).unwrap().pages.len(), expected);
}

#[test]
fn invalid_front_matter_aborts() {
    let err = precompile("---\ntitle: [oops\n---\n\n# Hello\n", &PagingOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Compile(CompileError::Frontmatter(FrontmatterError::Syntax { .. }))
    ));
}

#[test]
fn heading_directive_stays_out_of_titles() {
    let options = CompileOptions {
        render: RenderOptions {
            template: Some(Template::new("[{{ title }}] {{ contents }}")),
            ..RenderOptions::default()
        },
        ..markdown()
    };
    let compiled = compile("# Intro :slug[intro]\n\nBody", &options).unwrap();

    let page = &compiled.collection.pages[0];
    assert_eq!(page.metadata["slug"], "intro");
    assert_eq!(page.title().as_deref(), Some("Intro"));
    assert_eq!(compiled.pages[0].contents, "[Intro] # Intro\n\nBody");

    let document = CompileOptions {
        format: "html-document".to_string(),
        ..CompileOptions::default()
    };
    let html = compile("# Intro :slug[intro]\n\nBody", &document).unwrap();
    assert!(html.pages[0].contents.contains("<title>Intro</title>"));
}

#[test]
fn front_matter_error_points_into_document() {
    let err = precompile("---\ntitle: ok\nbad: [\n---\n\n# Hello\n", &PagingOptions::default())
        .unwrap_err();
    match err {
        PipelineError::Compile(CompileError::Frontmatter(FrontmatterError::Syntax {
            line, ..
        })) => assert!(matches!(line, Some(line) if line >= 3), "line {:?}", line),
        other => panic!("expected a front-matter error, got {:?}", other),
    }
}
