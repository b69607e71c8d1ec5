//! Printable HTML report.
//!
//! Produces a self-contained A4-oriented HTML document for a saved
//! calculation. The embedding app decides how to print it or turn it into
//! a PDF; this renderer only reads the record.

use crate::models::{AggregateResult, AllocationResult, CalculationRecord, HistoryEntry};
use crate::parse::format_brl;

/// Renderer for printable calculation reports.
pub struct HtmlReportRenderer;

impl Default for HtmlReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlReportRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render a saved calculation as a printable HTML document.
    pub fn render(&self, entry: &HistoryEntry) -> String {
        let generated_at = format_timestamp(&chrono::Utc::now().to_rfc3339());
        let calculated_at = format_timestamp(&entry.created_at);

        let body = match &entry.record {
            CalculationRecord::Single(result) => self.render_single(result),
            CalculationRecord::Multiple(result) => self.render_multiple(result),
        };

        format!(
            r#"<!DOCTYPE html>
<html lang='pt-BR'>
<head>
<meta charset='UTF-8'>
<title>Cálculo Hospitalar - {code}</title>
<style>
{style}
</style>
</head>
<body>
<div class='header'>
  <h1>CÁLCULO DE PROCEDIMENTOS HOSPITALARES</h1>
  <div class='subtitle'><strong>DATTRA</strong> &bull; Relatório gerado em: {generated_at}</div>
</div>
{body}
<div class='footer'>
  <strong>DATTRA - Sistema de Cálculo de Procedimentos Hospitalares</strong><br>
  Cálculo realizado em: {calculated_at}
</div>
</body>
</html>
"#,
            code = escape_html(entry.record.principal_code()),
            style = STYLE,
            generated_at = generated_at,
            body = body,
            calculated_at = calculated_at,
        )
    }

    fn render_single(&self, result: &AllocationResult) -> String {
        let mut html = String::new();

        html.push_str(&self.render_totals_grid(
            result.code.as_str(),
            result.adjusted_value_sh,
            result.value_tsp,
            result.adjusted_value_sp,
            result.anesthesia_enabled,
            result.anesthesia_value,
            result.surgeon_value,
            result.assistant_count,
            result.first_assistant_value,
            result.second_to_fifth_assistant_value(),
            result.total_points,
        ));

        html.push_str(&self.render_total_banner(
            result.total_procedure_value,
            result.anesthesia_enabled,
        ));

        html.push_str(&self.render_config_badges(
            result.anesthesia_enabled,
            f64::from(result.surcharge_percent),
            false,
            f64::from(result.assistant_count),
        ));

        html
    }

    fn render_multiple(&self, result: &AggregateResult) -> String {
        let mut html = String::new();

        html.push_str(&format!(
            "<div class='lines-section'>\n<h3>Detalhes por Linha ({})</h3>\n",
            result.lines.len()
        ));
        for line in &result.lines {
            html.push_str(&self.render_line_card(line));
        }
        html.push_str("</div>\n");

        html.push_str(&format!(
            "<div class='procedures-section'>\n<h3>Resumo - Múltiplos Procedimentos</h3>\n\
             <p><strong>Procedimento Principal:</strong> {}</p>\n\
             <p class='note'>O valor SH de cada linha é determinado pelo percentual \
             configurado para o procedimento principal selecionado.</p>\n</div>\n",
            escape_html(&result.principal_code)
        ));

        html.push_str(&self.render_totals_grid(
            result.principal_code.as_str(),
            result.totals.adjusted_value_sh,
            result.totals.value_tsp,
            result.totals.adjusted_value_sp,
            result.anesthesia_enabled,
            result.totals.anesthesia_value,
            result.totals.surgeon_value,
            result.mean_assistant_count.round() as u8,
            result.totals.first_assistant_value,
            result.totals.second_to_fifth_assistant_value(),
            result.totals.total_points,
        ));

        html.push_str(&self.render_total_banner(
            result.totals.total_procedure_value,
            result.anesthesia_enabled,
        ));

        html.push_str(&self.render_config_badges(
            result.anesthesia_enabled,
            result.mean_surcharge_percent,
            true,
            result.mean_assistant_count,
        ));

        html
    }

    fn render_line_card(&self, line: &crate::models::LineAllocation) -> String {
        let allocation = &line.allocation;
        let percent_badge = match line.sh_percent {
            Some(percent) => format!(
                "<span class='line-percent'>{}% do valor SH</span>",
                trim_percent(percent)
            ),
            None => "<span class='line-percent'>100% do valor SH</span>".to_string(),
        };

        let mut professionals = String::new();
        professionals.push_str(&info_line(
            "Valor Anestesia:",
            &format_brl(allocation.anesthesia_value),
        ));
        professionals.push_str(&info_line(
            "Valor Cirurgião:",
            &format_brl(allocation.surgeon_value),
        ));
        if allocation.assistant_count >= 1 {
            professionals.push_str(&info_line(
                "Valor 1º Auxiliar:",
                &format_brl(allocation.first_assistant_value),
            ));
        }
        if allocation.assistant_count >= 2 {
            professionals.push_str(&info_line(
                "Valor Auxiliares 2º ao 5º:",
                &format_brl(allocation.second_to_fifth_assistant_value()),
            ));
        }
        professionals.push_str(&info_line(
            "Valor Total SP:",
            &format_brl(allocation.adjusted_value_sp),
        ));

        format!(
            "<div class='line-item'>\n\
             <div class='line-header'>\n\
             <div class='line-badges'><span class='line-badge'>Linha {number}</span>{percent_badge}</div>\n\
             <span class='line-total'>{total}</span>\n\
             </div>\n\
             <div class='line-code'>{code}</div>\n\
             <div class='line-desc'>{description}</div>\n\
             <div class='grid-2'>\n\
             <div>\n<h5>Informações do Procedimento</h5>\n{info}</div>\n\
             <div>\n<h5>Valores dos Profissionais</h5>\n{professionals}</div>\n\
             </div>\n\
             </div>\n",
            number = line.line_number,
            percent_badge = percent_badge,
            total = format_brl(allocation.total_procedure_value),
            code = escape_html(&allocation.code),
            description = escape_html(&line.description),
            info = [
                info_line("Quantidade de Pontos:", &allocation.point_count.to_string()),
                info_line(
                    "Valor Incremento:",
                    &format!("{}%", allocation.surcharge_percent),
                ),
                info_line("Valor SH:", &format_brl(allocation.adjusted_value_sh)),
                info_line("Valor TSP:", &format_brl(allocation.value_tsp)),
            ]
            .concat(),
            professionals = professionals,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn render_totals_grid(
        &self,
        code: &str,
        value_sh: f64,
        value_tsp: f64,
        value_sp: f64,
        anesthesia_enabled: bool,
        anesthesia_value: f64,
        surgeon_value: f64,
        assistant_count: u8,
        first_assistant_value: f64,
        second_to_fifth_value: f64,
        total_points: f64,
    ) -> String {
        let code_display = escape_html(code);

        let anesthesia_display = if anesthesia_enabled {
            format_brl(anesthesia_value)
        } else {
            format_brl(0.0)
        };

        let mut professionals = String::new();
        professionals.push_str(&info_line("Valor Total Anestesia:", &anesthesia_display));
        professionals.push_str(&info_line("Total Cirurgião:", &format_brl(surgeon_value)));
        if assistant_count >= 1 {
            professionals.push_str(&info_line(
                "Total 1º Auxiliar:",
                &format_brl(first_assistant_value),
            ));
        }
        if assistant_count >= 2 {
            professionals.push_str(&info_line(
                "Total Auxiliares 2º ao 5º:",
                &format_brl(second_to_fifth_value),
            ));
        }
        professionals.push_str(&info_line(
            "Total Pontos:",
            &format!("{}", total_points.round() as i64),
        ));

        format!(
            "<div class='grid-2'>\n\
             <div class='info-group'>\n\
             <div class='section-title'>Totais do Procedimento</div>\n\
             {code_line}{sh}{tsp}{sp}</div>\n\
             <div class='info-group'>\n\
             <div class='section-title'>Totais dos Profissionais</div>\n\
             {professionals}</div>\n\
             </div>\n",
            code_line = info_line("Código Principal:", &code_display),
            sh = info_line("Valor Total SH:", &format_brl(value_sh)),
            tsp = info_line("Valor Total TSP:", &format_brl(value_tsp)),
            sp = info_line("Valor Total SP:", &format_brl(value_sp)),
            professionals = professionals,
        )
    }

    fn render_total_banner(&self, total: f64, anesthesia_enabled: bool) -> String {
        let description = if anesthesia_enabled {
            "SH + TSP + SP + Anestesia"
        } else {
            "SH + TSP + SP"
        };
        format!(
            "<div class='total-section'>\n\
             <h2>VALOR TOTAL DO PROCEDIMENTO</h2>\n\
             <div class='total-value'>{}</div>\n\
             <div class='total-description'>{}</div>\n\
             </div>\n",
            format_brl(total),
            description
        )
    }

    fn render_config_badges(
        &self,
        anesthesia_enabled: bool,
        surcharge_percent: f64,
        multiple: bool,
        assistant_count: f64,
    ) -> String {
        let assistants = assistant_count.round() as u32;
        let mut badges = String::new();
        if anesthesia_enabled {
            badges.push_str("<span class='badge badge-anestesia'>Anestesia</span>\n");
        }
        if surcharge_percent > 0.0 {
            badges.push_str(&format!(
                "<span class='badge badge-incremento'>Incremento {}%</span>\n",
                trim_percent(surcharge_percent)
            ));
        }
        if multiple {
            badges.push_str("<span class='badge badge-multiplos'>Múltiplos Procedimentos</span>\n");
        }
        if assistants > 0 {
            let label = if assistants == 1 { "Auxiliar" } else { "Auxiliares" };
            badges.push_str(&format!(
                "<span class='badge badge-auxiliar'>{} {}</span>\n",
                assistants, label
            ));
        }

        if badges.is_empty() {
            return String::new();
        }
        format!(
            "<div class='badges-section'>\n\
             <div class='section-title'>Configurações Ativas</div>\n\
             <div class='badges-container'>\n{}</div>\n</div>\n",
            badges
        )
    }
}

/// One label/value display row.
fn info_line(label: &str, value: &str) -> String {
    format!(
        "<div class='info-line'><span><strong>{}</strong></span><span>{}</span></div>\n",
        label, value
    )
}

/// Render a percentage without a trailing `.0` for whole numbers.
fn trim_percent(percent: f64) -> String {
    if (percent - percent.round()).abs() < f64::EPSILON {
        format!("{}", percent.round() as i64)
    } else {
        format!("{:.1}", percent)
    }
}

/// Format an RFC3339 timestamp as pt-BR `dd/mm/yyyy hh:mm`; unparseable
/// input falls through unchanged.
fn format_timestamp(rfc3339: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(rfc3339) {
        Ok(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        Err(_) => rfc3339.to_string(),
    }
}

/// Escape a string for HTML output.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  font-family: 'Arial', sans-serif;
  font-size: 12px;
  line-height: 1.4;
  color: #333;
  max-width: 210mm;
  margin: 0 auto;
  padding: 15mm;
  background: white;
}
.header { text-align: center; margin-bottom: 25px; border-bottom: 2px solid #2563eb; padding-bottom: 15px; }
.header h1 { color: #1e40af; font-size: 20px; margin-bottom: 8px; }
.header .subtitle { color: #6b7280; font-size: 11px; }
.section-title { color: #374151; font-size: 14px; font-weight: 600; margin-bottom: 12px; border-bottom: 1px solid #e5e7eb; padding-bottom: 5px; }
.grid-2 { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; margin-bottom: 20px; }
.info-group { background: #f9fafb; border: 1px solid #e5e7eb; padding: 15px; border-radius: 8px; }
.info-line { display: flex; justify-content: space-between; margin-bottom: 8px; font-size: 12px; }
.lines-section { background: #f0f9ff; border: 1px solid #bfdbfe; padding: 15px; border-radius: 8px; margin-bottom: 20px; }
.lines-section h3 { color: #1e40af; font-size: 13px; margin-bottom: 15px; }
.line-item { background: white; border: 1px solid #e0e7ff; border-left: 4px solid #3b82f6; padding: 12px; border-radius: 6px; margin-bottom: 10px; }
.line-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 8px; }
.line-badges { display: flex; gap: 6px; align-items: center; }
.line-badge { background: #3b82f6; color: white; padding: 2px 8px; border-radius: 12px; font-size: 10px; }
.line-percent { background: #f3f4f6; color: #374151; padding: 2px 8px; border-radius: 12px; font-size: 10px; }
.line-total { font-weight: 600; color: #059669; font-size: 12px; }
.line-code { font-weight: 600; font-size: 11px; margin-bottom: 3px; }
.line-desc { color: #6b7280; font-size: 10px; margin-bottom: 8px; }
.line-item h5 { font-size: 10px; color: #374151; margin-bottom: 8px; }
.procedures-section { background: #f0fdf4; border: 1px solid #bbf7d0; padding: 15px; border-radius: 8px; margin-bottom: 20px; }
.procedures-section h3 { color: #166534; font-size: 13px; margin-bottom: 10px; }
.procedures-section .note { font-size: 10px; color: #6b7280; margin-top: 5px; }
.total-section { background: linear-gradient(135deg, #f0fdf4 0%, #dcfce7 100%); border: 2px solid #22c55e; padding: 20px; border-radius: 12px; text-align: center; margin-top: 20px; }
.total-section h2 { color: #166534; font-size: 16px; margin-bottom: 10px; }
.total-value { font-size: 28px; font-weight: bold; color: #059669; margin-bottom: 8px; }
.total-description { color: #374151; font-size: 11px; }
.badges-section { margin-top: 20px; }
.badges-container { display: flex; flex-wrap: wrap; gap: 8px; margin-top: 8px; }
.badge { display: inline-flex; padding: 4px 10px; border-radius: 16px; font-size: 11px; }
.badge-anestesia { background: #3b82f6; color: white; }
.badge-incremento { background: #fef3c7; color: #92400e; border: 1px solid #f59e0b; }
.badge-multiplos { background: #f0fdf4; color: #166534; border: 1px solid #22c55e; }
.badge-auxiliar { background: #f3e8ff; color: #7c3aed; border: 1px solid #a855f7; }
.footer { margin-top: 25px; text-align: center; color: #6b7280; font-size: 10px; border-top: 1px solid #e5e7eb; padding-top: 15px; }
@media print { body { padding: 10mm; font-size: 11px; } .total-value { font-size: 24px; } }
"#;
