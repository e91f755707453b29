use std::fmt::{self, Write};
use std::path::Path;

use pitest_json::{Measures, Metric, MutantRecord, MutantStatus, MutantsByLine};

use crate::Error;
use crate::annotator::{classify, LineMutationSummary, MutantStyle};
use crate::assets::AssetResolver;
use crate::files::SourceLine;

/// Everything a render needs, passed in explicitly.
pub struct RenderContext<'a> {
    /// Display name of the rendered file, used for page titles.
    pub title: &'a str,
    pub lines: &'a [SourceLine],
    pub measures: &'a Measures,
    pub assets: &'a AssetResolver,
}

/// Writes ` modifier` when the modifier is non-empty, so class lists never end in a space.
fn write_class_modifier(html_out: &mut String, modifier: &str) -> fmt::Result {
    if modifier.is_empty() {
        return Ok(());
    }
    write!(html_out, " {modifier}")
}

fn write_stylesheet(html_out: &mut String, assets: &AssetResolver) -> fmt::Result {
    write!(html_out, "<link type=\"text/css\" rel=\"stylesheet\" media=\"all\" href=\"{}\">", assets.url(AssetResolver::STYLESHEET))
}

/// Writes the header with the coverage figure followed by every mutation counter.
fn write_measures_header(html_out: &mut String, measures: &Measures) -> fmt::Result {
    html_out.push_str("<div class=\"gwt-ViewerHeader\"><table cellspacing=\"0\" cellpadding=\"0\"><tbody><tr>");
    write!(html_out, "<td align=\"left\" style=\"vertical-align: top; \"><div class=\"big\">{}</div></td>",
           html_escape::encode_text(&measures.format(Metric::Coverage)))?;
    for metric in Metric::HEADER_COUNTERS {
        write!(html_out, "<td align=\"left\" style=\"vertical-align: top; \"><div class=\"metric\"><b>{}</b>: </div></td>", metric.short_name())?;
        write!(html_out, "<td align=\"left\" style=\"vertical-align: top; \"><div class=\"value\">{}</div></td>",
               html_escape::encode_text(&measures.format(metric)))?;
    }
    html_out.push_str("</tr></tbody></table></div>");
    Ok(())
}

fn write_line_row(html_out: &mut String, line: &SourceLine, summary: &LineMutationSummary) -> fmt::Result {
    let style = summary.classification.as_str();
    let number = line.number;

    write!(html_out, "<tr id=\"pos{number}\"><td id=\"L{number}\"><div class=\"ln")?;
    if summary.has_mutants() {
        html_out.push_str(" mutationlidsection");
    }
    write!(html_out, "\">{number}</div></td>")?;

    html_out.push_str("<td><div class=\"val");
    write_class_modifier(html_out, style)?;
    write!(html_out, "\">{}</div></td>", summary.count_label())?;

    html_out.push_str("<td><div class=\"val");
    write_class_modifier(html_out, style)?;
    write!(html_out, "\">{}</div></td>", summary.ratio_label())?;

    html_out.push_str("<td><div class=\"src");
    write_class_modifier(html_out, style)?;
    write!(html_out, "\"><pre>{}</pre></div></td></tr>", line.html)
}

fn write_mutant(html_out: &mut String, mutant: &MutantRecord, assets: &AssetResolver) -> fmt::Result {
    if let MutantStatus::Unrecognized(status) = &mutant.status {
        tracing::debug!(status = %status, "no style for mutant status");
    }

    html_out.push_str("<div class=\"mutation\"><div class=\"vtitle\"><span");
    let style = MutantStyle::of(&mutant.status);
    if style != MutantStyle::Neutral {
        write!(html_out, " class=\"{}\"", style.as_str())?;
    }
    write!(html_out, ">{}</span>", html_escape::encode_text(mutant.status.as_str()))?;
    write!(html_out, "&nbsp;<img alt=\"Sep12\" src=\"{}\">&nbsp;", assets.url(AssetResolver::SEPARATOR))?;
    write!(html_out, "<span class=\"mutationname\">{}</span></div>", html_escape::encode_text(&mutant.mutator_name))?;
    write!(html_out, "<div class=\"mutationDescription\">{}</div>", html_escape::encode_text(&mutant.mutator_description))?;
    if let Some(killing_test) = &mutant.killing_test {
        write!(html_out, "<div class=\"mutationKillingTest\">Killed by {}</div>", html_escape::encode_text(killing_test))?;
    }
    html_out.push_str("</div>&nbsp;");
    Ok(())
}

/// Writes the expandable row listing every mutant of a line.
fn write_mutants_row(html_out: &mut String, number: u32, mutants: &[MutantRecord], assets: &AssetResolver) -> fmt::Result {
    write!(html_out, "<tr id=\"mutations{number}\" class=\"mutations-row\"><td></td><td></td><td></td><td><div class=\"mutations\">")?;
    for mutant in mutants {
        write_mutant(html_out, mutant, assets)?;
    }
    html_out.push_str("</div></td></tr>");
    Ok(())
}

fn write_source_table(html_out: &mut String, lines: &[SourceLine], mutants: &MutantsByLine, assets: &AssetResolver) -> fmt::Result {
    html_out.push_str("<table id=\"sourcePanel\" class=\"gwt-SourcePanel\" cellpadding=\"0\" cellspacing=\"0\"><tbody><tr><td align=\"left\" style=\"vertical-align: top; \">");
    html_out.push_str("<table class=\"sources code\"><tbody>");
    for line in lines {
        let summary = classify(line.number, mutants);
        write_line_row(html_out, line, &summary)?;
        if let Some(records) = mutants.get(line.number) {
            write_mutants_row(html_out, line.number, records, assets)?;
        }
    }
    html_out.push_str("</tbody></table></td></tr></tbody></table>");
    Ok(())
}

/// Renders the mutation source tab: the measures header and the annotated source table.
///
/// Fails when the mutation data measure is missing or malformed.
pub fn render_source_tab(ctx: &RenderContext<'_>) -> Result<String, Error> {
    let mutants = ctx.measures.mutants_by_line()?;
    for line in mutants.lines_outside(ctx.lines.len()) {
        tracing::debug!(line, file = ctx.title, "ignoring mutants outside the source");
    }

    let mut render = String::new();
    write_stylesheet(&mut render, ctx.assets)?;
    write_measures_header(&mut render, ctx.measures)?;
    write_source_table(&mut render, ctx.lines, &mutants, ctx.assets)?;
    Ok(render)
}

/// Renders a standalone document around the source tab.
pub fn render_page(ctx: &RenderContext<'_>) -> Result<String, Error> {
    let tab = render_source_tab(ctx)?;
    let mut render = String::from("<!DOCTYPE html><html><head>");
    render.push_str("<meta charset=\"utf-8\">");
    write!(render, "<title>PIT Mutations - {}</title>", html_escape::encode_text(ctx.title))?;
    render.push_str("</head><body>");
    render.push_str(&tab);
    render.push_str("</body></html>");
    Ok(render)
}

/// Renders the start page listing the files that have mutation measures.
pub fn render_index(paths: &[impl AsRef<Path>], assets: &AssetResolver) -> Result<String, Error> {
    render_index_with_error(paths, assets, "")
}

/// Renders the start page with an error message above the file list.
pub fn render_index_with_error(paths: &[impl AsRef<Path>], assets: &AssetResolver, error_str: &str) -> Result<String, Error> {
    let mut render = String::from("<!DOCTYPE html><html><head>");
    render.push_str("<meta charset=\"utf-8\">");
    if error_str.is_empty() {
        render.push_str("<title>PIT Mutations</title>");
    } else {
        write!(render, "<title>PIT Mutations - Error: {}</title>", html_escape::encode_text(error_str))?;
    }
    write_stylesheet(&mut render, assets)?;
    render.push_str("</head><body>");
    if !error_str.is_empty() {
        write!(render, "<div class=\"error\">{}</div>", html_escape::encode_text(error_str))?;
    }
    render.push_str("<ul class=\"files\">");
    for path in paths {
        let path = path.as_ref().to_string_lossy();
        write!(render, "<li><a href=\"/file/{}\">{}</a></li>",
               html_escape::encode_double_quoted_attribute(&path), html_escape::encode_text(&path))?;
    }
    render.push_str("</ul></body></html>");
    Ok(render)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::files::plain_lines;

    fn measures(data: &str) -> Measures {
        let mut measures = Measures::new();
        measures.insert(Metric::Data, data);
        measures
    }

    fn render(source: &str, measures: &Measures) -> Result<String, Error> {
        let lines = plain_lines(source);
        let assets = AssetResolver::default();
        render_source_tab(&RenderContext { title: "Calculator.java", lines: &lines, measures, assets: &assets })
    }

    #[test]
    fn lines_without_mutants_are_blank() {
        let html = render("a\nb\n", &measures("{}")).unwrap();
        assert!(html.contains("<tr id=\"pos1\"><td id=\"L1\"><div class=\"ln\">1</div></td><td><div class=\"val\">&nbsp;</div></td><td><div class=\"val\">&nbsp;</div></td><td><div class=\"src\"><pre>a</pre></div></td></tr>"));
        assert!(!html.contains("mutations-row"));
    }

    #[test]
    fn survived_line_is_red_with_counts() {
        let html = render("a\nb\nc\n", &measures(r#"{"2": [{"s": "SURVIVED"}, {"s": "KILLED"}]}"#)).unwrap();
        assert!(html.contains("<div class=\"ln mutationlidsection\">2</div>"));
        assert!(html.contains("<td><div class=\"val red\">2</div></td><td><div class=\"val red\">1/0</div></td>"));
        assert!(html.contains("<div class=\"src red\"><pre>b</pre></div>"));
        assert!(html.contains("<tr id=\"mutations2\" class=\"mutations-row\">"));
        assert_eq!(html.matches("class=\"mutation\"").count(), 2);
    }

    #[test]
    fn detail_row_lists_every_mutant() {
        let html = render("x = 1;\n", &measures(r#"{"1": [
            {"s": "NO_COVERAGE", "mname": "Math Mutator", "mdesc": "Replaced integer addition with subtraction"},
            {"s": "KILLED", "mname": "Increments Mutator", "mdesc": "Changed increment", "killtest": "CalculatorTest.add"}
        ]}"#)).unwrap();

        assert!(html.contains("<div class=\"val orange\">2</div>"));
        assert!(html.contains("<span class=\"mutationnocoverage\">NO_COVERAGE</span>&nbsp;<img alt=\"Sep12\" src=\"/static/images/sep12.svg\">&nbsp;<span class=\"mutationname\">Math Mutator</span>"));
        assert!(html.contains("<div class=\"mutationDescription\">Replaced integer addition with subtraction</div>"));
        assert!(html.contains("<span class=\"mutationkilled\">KILLED</span>"));
        assert!(html.contains("<div class=\"mutationKillingTest\">Killed by CalculatorTest.add</div>"));
    }

    #[test]
    fn unrecognized_status_is_unstyled() {
        let html = render("x\n", &measures(r#"{"1": [{"s": "NON_VIABLE", "mname": "m"}]}"#)).unwrap();
        assert!(html.contains("<span>NON_VIABLE</span>"));
        assert!(html.contains("<div class=\"val green\">1</div>"));
    }

    #[test]
    fn mutants_without_status_are_counted_but_unstyled() {
        let html = render("x\n", &measures(r#"{"1": [{"mname": "m"}, {"s": null}, {"s": "SURVIVED"}]}"#)).unwrap();
        assert!(html.contains("<div class=\"val red\">3</div>"));
        assert!(html.contains("<div class=\"val red\">1/0</div>"));
        assert_eq!(html.matches("<span></span>").count(), 2);
    }

    #[test]
    fn mutant_text_is_escaped() {
        let html = render("x\n", &measures(r#"{"1": [{"s": "SURVIVED", "mname": "<script>", "mdesc": "a < b && c"}]}"#)).unwrap();
        assert!(html.contains("<span class=\"mutationname\">&lt;script&gt;</span>"));
        assert!(html.contains("a &lt; b &amp;&amp; c"));
    }

    #[test]
    fn mutants_outside_the_source_are_ignored() {
        let html = render("a\n", &measures(r#"{"0": [{"s": "SURVIVED"}], "7": [{"s": "SURVIVED"}]}"#)).unwrap();
        assert!(!html.contains("val red"));
        assert!(!html.contains("mutations-row"));
        assert!(!html.contains("pos7"));
    }

    #[test]
    fn header_shows_formatted_measures() {
        let mut measures = measures("{}");
        measures.insert(Metric::Coverage, 75.0);
        measures.insert(Metric::Total, 4);
        measures.insert(Metric::Survived, 1);

        let html = render("a\n", &measures).unwrap();
        assert!(html.contains("<div class=\"big\">75.0%</div>"));
        assert!(html.contains("<b>Total Mutations</b>: </div></td><td align=\"left\" style=\"vertical-align: top; \"><div class=\"value\">4</div>"));
        assert!(html.contains("<b>Killed Mutations</b>: </div></td><td align=\"left\" style=\"vertical-align: top; \"><div class=\"value\"></div>"));
        assert!(html.starts_with("<link type=\"text/css\" rel=\"stylesheet\" media=\"all\" href=\"/static/pitest.css\">"));
    }

    #[test]
    fn missing_or_malformed_data_aborts() {
        assert_matches!(render("a\n", &Measures::new()), Err(Error::Data(pitest_json::Error::MissingMeasure(_))));
        assert_matches!(render("a\n", &measures("{\"1\": [")), Err(Error::Data(pitest_json::Error::Json(_))));
    }

    #[test]
    fn page_wraps_the_tab() {
        let lines = plain_lines("a\n");
        let measures = measures("{}");
        let assets = AssetResolver::default();
        let ctx = RenderContext { title: "A<B>.java", lines: &lines, measures: &measures, assets: &assets };

        let page = render_page(&ctx).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>PIT Mutations - A&lt;B&gt;.java</title>"));
        assert!(page.contains(&render_source_tab(&ctx).unwrap()));
    }

    #[test]
    fn index_links_files() {
        let assets = AssetResolver::default();
        let html = render_index(&["org/example/Calculator.java"], &assets).unwrap();
        assert!(html.contains("<a href=\"/file/org/example/Calculator.java\">org/example/Calculator.java</a>"));

        let html = render_index_with_error(&[] as &[&str], &assets, "file not found: X.java").unwrap();
        assert!(html.contains("<div class=\"error\">file not found: X.java</div>"));
    }
}
