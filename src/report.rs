//! Content of the Propwell AMP Weekly Platform Brief.

use log::info;

use crate::brand::PageGeometry;
use crate::builder::{DocumentBuilder, RenderedPdf, Story};
use crate::config::BriefConfig;
use crate::elements::{
    Anchor, Banner, BrandBar, CalloutBox, Heading, KeepTogether, Marker, Spacer, TextFlow,
};
use crate::error::BriefError;
use crate::markup::parse_markup;
use crate::styles::{Role, StyleRegistry};
use crate::tables::{make_bold_first_col_table, make_metric_card, make_table, MetricCardRow};

/// Document title written into the PDF metadata.
pub const TITLE: &str = "Propwell AMP Weekly Platform Brief";

const BANNER_INSET: f64 = 24.0;
const CARD_GAP: f64 = 6.0;

/// Appends flowables to a story using the shared registry.
struct Composer<'a> {
    styles: &'a StyleRegistry,
    geometry: &'a PageGeometry,
    anchor: &'a Anchor,
    story: Story,
}

impl<'a> Composer<'a> {
    fn paragraph(&self, text: &str, role: Role) -> Result<TextFlow, BriefError> {
        Ok(TextFlow::new(parse_markup(text)?, self.styles.get(role)))
    }

    fn check_item(&self, text: &str) -> Result<TextFlow, BriefError> {
        Ok(self.paragraph(text, Role::Check)?.with_marker(Marker::CheckBox))
    }

    fn heading(&mut self, text: &str, role: Role) -> Result<(), BriefError> {
        let heading = Heading::new(parse_markup(text)?, self.styles.get(role));
        let heading = if role == Role::Heading1 {
            heading.with_anchor(self.anchor.clone())
        } else {
            heading
        };
        self.story.push(heading);
        Ok(())
    }

    fn h1(&mut self, text: &str) -> Result<(), BriefError> {
        self.heading(text, Role::Heading1)
    }

    fn h2(&mut self, text: &str) -> Result<(), BriefError> {
        self.heading(text, Role::Heading2)
    }

    fn body(&mut self, text: &str) -> Result<(), BriefError> {
        let paragraph = self.paragraph(text, Role::Body)?;
        self.story.push(paragraph);
        Ok(())
    }

    fn space(&mut self, height: f64) {
        self.story.push(Spacer::new(height));
    }

    fn callout(&mut self, text: &str) -> Result<(), BriefError> {
        self.story.push(CalloutBox::new(
            self.geometry.usable_width(),
            parse_markup(text)?,
            self.styles.get(Role::Callout),
        ));
        Ok(())
    }

    fn checklist(&mut self, items: &[&str]) -> Result<(), BriefError> {
        for item in items {
            let flow = self.check_item(item)?;
            self.story.push(flow);
        }
        Ok(())
    }

    fn kept_checklist(&mut self, items: &[&str]) -> Result<(), BriefError> {
        let flows = items
            .iter()
            .map(|item| self.check_item(item))
            .collect::<Result<Vec<_>, _>>()?;
        self.story
            .push(KeepTogether::new(flows, self.geometry.frame_height()));
        Ok(())
    }

    fn table<const N: usize>(
        &mut self,
        headers: [&str; N],
        rows: &[[&str; N]],
        fractions: [f64; N],
    ) -> Result<(), BriefError> {
        let table = make_table(self.styles, &headers, rows.iter().copied(), &fractions)?;
        self.story.push(table);
        Ok(())
    }

    fn labelled_table<const N: usize>(
        &mut self,
        headers: [&str; N],
        rows: &[[&str; N]],
        fractions: [f64; N],
    ) -> Result<(), BriefError> {
        let table =
            make_bold_first_col_table(self.styles, &headers, rows.iter().copied(), &fractions)?;
        self.story.push(table);
        Ok(())
    }
}

/// Builds the flow sequence of the weekly brief.
///
/// Section headings are attached to `anchor` so the rendered outline lists them.
pub fn build_weekly_brief(
    styles: &StyleRegistry,
    geometry: &PageGeometry,
    anchor: &Anchor,
) -> Result<Story, BriefError> {
    let mut doc = Composer {
        styles,
        geometry,
        anchor,
        story: Story::new(),
    };

    cover(&mut doc)?;
    platform_status(&mut doc)?;
    test_account(&mut doc)?;
    api_access(&mut doc)?;
    rentcast(&mut doc)?;
    production_cost(&mut doc)?;
    action_items(&mut doc)?;
    budget_notes(&mut doc)?;

    Ok(doc.story)
}

fn cover(doc: &mut Composer<'_>) -> Result<(), BriefError> {
    let width = doc.geometry.usable_width() - BANNER_INSET;
    let banner = Banner::new(width)
        .with_line(parse_markup("PROPWELL AMP")?, doc.styles.get(Role::Title))
        .with_line(
            parse_markup("Weekly Platform Brief")?,
            doc.styles.get(Role::Subtitle),
        )
        .with_line(
            parse_markup("Week of February 23, 2026")?,
            doc.styles.get(Role::Date),
        );
    doc.story.push(banner);
    doc.story.push(BrandBar::new(width));
    doc.space(16.0);

    let cards = [
        ("HC + Rentometer", "$182/mo"),
        ("Data Cost / Report", "~$1.32"),
        ("Manual Cost Replaced", "$25-50"),
        ("Time Saved / Report", "25-45 min"),
    ]
    .iter()
    .map(|(label, value)| make_metric_card(doc.styles, label, value))
    .collect::<Result<Vec<_>, _>>()?;
    doc.story.push(MetricCardRow::new(cards, CARD_GAP));
    doc.space(16.0);
    Ok(())
}

fn platform_status(doc: &mut Composer<'_>) -> Result<(), BriefError> {
    doc.h1("1. Platform Status")?;
    doc.body(
        "Propwell AMP is <b>deployed and demo-ready</b> at am-platform.vercel.app. \
         The platform is running in mock data mode pending API subscription approvals. \
         All three core tools are functional: Comp Analysis, Portfolio Summary, and Underwriting Models.",
    )?;
    doc.space(4.0);
    doc.table(
        ["Component", "Status"],
        &[
            ["Web App (Next.js + Supabase)", "Live \u{2014} deployed to Vercel production"],
            ["Comp Analysis Tool", "Complete \u{2014} address input, comps, rent rec, scoring"],
            ["Portfolio Summary", "Complete \u{2014} aggregated metrics, sort, CSV export"],
            [
                "Underwriting Models",
                "Complete \u{2014} LTH / F&amp;F / STR with IRR, Cap Rate, DSCR",
            ],
            ["Authentication", "Live \u{2014} Supabase OAuth, RLS on all tables"],
            [
                "Branding",
                "Complete \u{2014} Propwell AMP identity, bolt icon, teal/greenery",
            ],
        ],
        [0.4, 0.6],
    )?;
    doc.space(12.0);
    Ok(())
}

fn test_account(doc: &mut Composer<'_>) -> Result<(), BriefError> {
    doc.h1("2. Test Account for Jeff Gravelle")?;
    doc.callout(
        "<b>Login URL:</b> am-platform.vercel.app/signin<br/>\
         <b>Email:</b> jgravelle@propwell.co<br/>\
         <b>Password:</b> PropwellAMP2026!",
    )?;
    doc.space(8.0);
    doc.body("<b>Testing checklist:</b>")?;
    doc.kept_checklist(&[
        "Sign in with credentials above",
        "Run a Comp Analysis (try: 732 W Concord St, Orlando, FL 32805)",
        "Review results: comps table, rent recommendation, vacancy scenarios, property score",
        "Check Portfolio Summary \u{2014} sort columns, export CSV",
        "Run an Underwriting Model (LTH, F&amp;F, or STR) on any property",
        "Open detail views from Dashboard recent items",
        "Test on mobile (responsive design)",
    ])?;
    doc.space(6.0);
    Ok(())
}

fn api_access(doc: &mut Composer<'_>) -> Result<(), BriefError> {
    doc.h1("3. API Access Request \u{2014} HouseCanary &amp; Rentometer")?;
    doc.body(
        "To move from mock data to <b>live market data</b>, we need upgraded access to two \
         data providers. These are non-overlapping \u{2014} each delivers unique data the other cannot.",
    )?;
    doc.space(8.0);

    doc.h2("3a. HouseCanary \u{2014} Market Analytics (No Alternative)")?;
    doc.body(
        "HouseCanary is the only provider with MSA and ZIP-level market health scoring. \
         This powers the 12-metric market analysis and property scoring engine in AMP. \
         No other API offers this combination of market-level data.",
    )?;
    doc.labelled_table(
        ["", "Detail"],
        &[
            ["Plan Required", "Teams (Annual)"],
            ["Annual Cost", "$1,990/yr"],
            ["Monthly Effective", "$165.83/mo"],
            ["Included", "40 reports/mo + full API access"],
            ["Per-Call Cost", "$0.30 (Basic endpoints)"],
        ],
        [0.28, 0.72],
    )?;
    doc.space(6.0);
    doc.body("<b>What it provides per property run:</b>")?;
    doc.table(
        ["Endpoint", "Cost/Call", "Data Delivered"],
        &[
            ["Property Details", "$0.30", "Bed/bath/sqft verification, property type"],
            ["HPI Forecast (1yr)", "$0.30", "Home price index forecast"],
            ["RPI Forecast (1yr)", "$0.30", "Rental price index forecast"],
            ["Market Grade", "$0.30", "A-F grade for market health"],
            ["Risk of Decline", "$0.30", "Probability of price decline"],
            ["Sale-to-List / DOM / Supply", "$0.30", "Demand and absorption metrics"],
            ["Population Growth / Yield", "$0.30", "Growth and gross yield at ZIP"],
        ],
        [0.30, 0.12, 0.58],
    )?;
    doc.body(
        "HC cost per Tier 1 property: <b>$1.20</b> (4 calls \u{00d7} $0.30 for MSA + ZIP stats)",
    )?;
    doc.space(10.0);

    doc.h2("3b. Rentometer \u{2014} Rent Benchmarking (No Alternative)")?;
    doc.body(
        "Rentometer provides statistical rent distribution data \u{2014} percentiles, standard deviation, \
         sample counts, and individual nearby comp listings. This is the rent intelligence layer \
         that no other single provider replicates at this depth.",
    )?;
    doc.labelled_table(
        ["", "Detail"],
        &[
            ["Plan Required", "Pro (Annual)"],
            ["Annual Cost", "$199/yr"],
            ["Monthly Effective", "$16.58/mo"],
            ["Included", "500 reports/yr (~42/mo), ~5,000 credits"],
            ["Per-Credit Cost", "$0.06\u{2013}0.10"],
        ],
        [0.28, 0.72],
    )?;
    doc.space(6.0);
    doc.body(
        "Rentometer cost per property: <b>$0.12\u{2013}0.20</b> (2 credits: summary + nearby comps)",
    )?;
    doc.space(10.0);

    doc.h2("3c. Combined Ask \u{2014} HC + Rentometer")?;
    doc.labelled_table(
        ["", "Monthly", "Annual"],
        &[
            ["HouseCanary Teams", "$165.83", "$1,990"],
            ["Rentometer Pro", "$16.58", "$199"],
            ["TOTAL (Fixed)", "$182.41/mo", "$2,189/yr"],
        ],
        [0.40, 0.30, 0.30],
    )?;
    doc.space(4.0);
    doc.body(
        "Variable cost per Tier 1 property run (HC + Rentometer only): <b>~$1.32\u{2013}1.40</b>",
    )?;
    doc.space(10.0);
    Ok(())
}

fn rentcast(doc: &mut Composer<'_>) -> Result<(), BriefError> {
    doc.h1("4. RentCast \u{2014} Evaluate as Third Provider")?;
    doc.body(
        "RentCast is a third data provider currently in the pipeline design. Unlike HC and Rentometer, \
         RentCast has <b>significant overlap</b> with what the other two already provide. \
         The question is whether the overlap justifies the additional $74/mo.",
    )?;
    doc.space(6.0);
    doc.labelled_table(
        ["", "Detail"],
        &[
            ["Plan", "Foundation"],
            ["Monthly Cost", "$74/mo ($888/yr)"],
            ["Included", "1,000 calls/mo"],
            ["Per-Call Cost", "$0.074 effective"],
        ],
        [0.28, 0.72],
    )?;
    doc.space(8.0);

    doc.body("<b>Where RentCast overlaps vs. adds value:</b>")?;
    doc.table(
        ["Data Point", "RentCast", "Already Covered By", "Additive?"],
        &[
            [
                "Property details (bed/bath/sqft)",
                "$0.074/call",
                "HC Property Details ($0.30)",
                "Cheaper, not unique",
            ],
            [
                "Rental AVM (rent estimate)",
                "$0.074/call",
                "HC Rental AVM ($2.50 premium)",
                "Much cheaper for Tier 2",
            ],
            [
                "Rental comps (3-5 listings)",
                "$0.074/call",
                "Rentometer nearby comps",
                "Overlaps",
            ],
            [
                "Property value estimate",
                "$0.074/call",
                "HC Value Forecast ($2.50)",
                "Much cheaper for Tier 2",
            ],
            [
                "Sale history / tax data",
                "$0.074/call",
                "HC Property Details",
                "Overlaps",
            ],
        ],
        [0.24, 0.14, 0.32, 0.30],
    )?;
    doc.space(8.0);

    doc.body("<b>Cost comparison \u{2014} with vs. without RentCast:</b>")?;
    doc.labelled_table(
        ["", "HC + Rentometer Only", "HC + Rentometer + RentCast"],
        &[
            ["Fixed monthly", "$182.41", "$256.41"],
            ["Tier 1 data cost / property", "~$1.32", "~$1.47"],
            [
                "Tier 2 data cost / property",
                "~$3.82 (HC premium AVM)",
                "~$1.55 (RentCast AVM)",
            ],
            [
                "Best for",
                "Tier 1 focus, lower fixed cost",
                "Heavy Tier 2 usage, cheaper AVMs",
            ],
        ],
        [0.30, 0.35, 0.35],
    )?;
    doc.space(6.0);
    doc.callout(
        "<b>Recommendation:</b> Start with HC + Rentometer ($182/mo). Evaluate RentCast after \
         live data is running. RentCast becomes cost-justified if Tier 2 volume exceeds ~30 reports/mo, \
         where the cheaper AVM calls ($0.074 vs $2.50) offset the $74/mo subscription.",
    )?;
    doc.space(12.0);
    Ok(())
}

fn production_cost(doc: &mut Composer<'_>) -> Result<(), BriefError> {
    doc.h1("5. Production Cost \u{2014} Manual vs. Automated")?;
    doc.body(
        "The $75 (Tier 1) and $150 (Tier 2) figures represent <b>internal production cost</b> \
         to produce each report manually \u{2014} analyst time at $50/hr. AMP replaces this manual \
         production with automated API calls + brief review.",
    )?;
    doc.space(6.0);
    doc.labelled_table(
        ["", "Manual Production", "AMP Automated", "Savings / Report"],
        &[
            [
                "Tier 1 \u{2014} Comp Analysis",
                "$25 (30 min @ $50/hr)",
                "~$1.32 data + 5 min review",
                "~$19.50 / report",
            ],
            [
                "Tier 2 \u{2014} Investment Model",
                "$50 (60 min @ $50/hr)",
                "~$3.82 data + 15 min review",
                "~$33.68 / report",
            ],
        ],
        [0.22, 0.26, 0.28, 0.24],
    )?;
    doc.space(8.0);

    doc.body("<b>At scale (200 leads/mo \u{2014} 150 T1 + 50 T2):</b>")?;
    doc.labelled_table(
        ["Metric", "Manual", "Automated (AMP)"],
        &[
            ["Tier 1 production time", "30 min / report", "5 min review"],
            ["Tier 2 production time", "60 min / report", "15 min review"],
            [
                "Monthly production cost",
                "$6,250 labor",
                "$380 data + $1,250 review = $1,630",
            ],
            ["Monthly analyst hours", "125 hrs (0.78 FTE)", "25 hrs (0.16 FTE)"],
            ["Monthly savings", "\u{2014}", "$4,620"],
            ["Annual savings", "\u{2014}", "$55,440"],
            ["FTE capacity freed", "\u{2014}", "0.63 FTE"],
        ],
        [0.30, 0.35, 0.35],
    )?;
    doc.space(8.0);
    doc.callout(
        "<b>Key takeaway:</b> At $182/mo in fixed API costs, the platform pays for itself after \
         <b>10 Tier 1 reports</b> per month in labor savings alone. Every report beyond that is \
         net capacity freed.",
    )?;
    doc.space(14.0);
    Ok(())
}

fn action_items(doc: &mut Composer<'_>) -> Result<(), BriefError> {
    doc.h1("6. Action Items")?;
    doc.body("<b>For Jeff (Approvals):</b>")?;
    doc.checklist(&[
        "Test the platform using credentials on page 1",
        "Approve HouseCanary Teams upgrade \u{2014} $1,990/yr ($165.83/mo)",
        "Approve Rentometer Pro subscription \u{2014} $199/yr ($16.58/mo)",
        "Decide on RentCast \u{2014} add now ($74/mo) or evaluate after go-live",
        "Total ask without RentCast: $182.41/mo fixed + ~$1.32 per property",
    ])?;
    doc.space(8.0);

    doc.body("<b>For Kris (Post-Approval):</b>")?;
    doc.checklist(&[
        "Activate HouseCanary Teams, add API key to platform",
        "Set up Rentometer Pro, add API key",
        "Switch platform from mock to live data",
        "Calibrate scoring model against 10 real Propwell reports",
        "Deploy live-data version to production",
        "If RentCast approved: complete account creation and integrate",
    ])?;
    doc.space(12.0);
    Ok(())
}

fn budget_notes(doc: &mut Composer<'_>) -> Result<(), BriefError> {
    doc.h1("7. Budget File Review Notes")?;
    doc.body(
        "The <b>AM_Pipeline_Financial_Model.xlsx</b> (6 tabs) is well-built \u{2014} all formulas verified, \
         three sensitivity scenarios modeled, breakeven in Month 1. However, the model bundles all \
         three providers together. Should be updated to reflect HC + Rentometer as baseline.",
    )?;
    doc.space(4.0);
    let flagged = doc.paragraph(
        "<b>Issues flagged in propwell_AM budget model_021326.xlsx:</b>",
        Role::BodyBold,
    )?;
    doc.story.push(flagged);
    doc.body(
        "\u{2022}  Row 73 shows \"HC Basic Access\" at $20/mo flat \u{2014} needs update to \
         <b>HouseCanary Teams at $165.83/mo</b><br/>\
         \u{2022}  Rows 74-87 (Rentometer + RentCast data costs) are empty \u{2014} need to be populated<br/>\
         \u{2022}  Financial model should separate HC + Rentometer baseline from RentCast-optional scenario<br/>\
         \u{2022}  Per-property cost formulas need to reflect correct provider mix",
    )?;
    Ok(())
}

/// Renders the brief and writes it to `config.output`.
pub fn generate(config: &BriefConfig) -> Result<RenderedPdf, BriefError> {
    let styles = StyleRegistry::brand();
    let builder = DocumentBuilder::new()
        .with_title(TITLE)
        .with_fonts_dir(config.fonts_dir.clone());
    let geometry = builder.geometry();
    let anchor = Anchor::new(builder.outline(), builder.tracker());

    let story = build_weekly_brief(&styles, &geometry, &anchor)?;
    info!("assembled {} flowables", story.len());
    let rendered = builder.render(story)?;

    let rendered = if config.bookmarks {
        add_bookmarks(rendered)?
    } else {
        rendered
    };
    rendered.write_to(&config.output)?;
    Ok(rendered)
}

#[cfg(feature = "bookmarks")]
fn add_bookmarks(rendered: RenderedPdf) -> Result<RenderedPdf, BriefError> {
    rendered.with_bookmarks()
}

#[cfg(not(feature = "bookmarks"))]
fn add_bookmarks(rendered: RenderedPdf) -> Result<RenderedPdf, BriefError> {
    log::warn!("bookmarks requested but the `bookmarks` feature is not enabled; skipping");
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{Outline, PageTracker};

    fn assemble() -> Story {
        let styles = StyleRegistry::brand();
        let anchor = Anchor::new(Outline::new(), PageTracker::new());
        build_weekly_brief(&styles, &PageGeometry::letter(), &anchor).expect("brief content")
    }

    #[test]
    fn brief_content_parses_and_validates() {
        let story = assemble();
        assert!(story.len() > 60);
    }
}
