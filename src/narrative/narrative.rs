use crate::{
    narrative::{format_percent, join_list},
    overlay::OverlayResult,
};

/// Describe a precinct overlay in a few deterministic sentences.
///
/// With no intersecting zones, a single no-data sentence is produced. Otherwise the text
/// states the zone count, the classes present in dominance order, the dominant class share,
/// the share of every other class, and a closing characterisation.
pub fn generate_narrative(
    result: &OverlayResult,
    precinct: &str,
    year: u16,
    scale_label: &str,
    indicator: &str,
) -> String {
    let count = result.dzn_intersect_count();
    let Some((dominant, others)) = result.classes().split_first().filter(|_| count > 0) else {
        return format!(
            "The **{precinct}** precinct intersects with **0** **{scale_label}** area(s) based on the **{year}** dataset, so no classes are present."
        );
    };

    let mut sentences = Vec::with_capacity(5);
    sentences.push(format!(
        "The **{precinct}** precinct intersects with **{count}** **{scale_label}** area(s) based on the **{year}** dataset."
    ));

    let labels = result.classes().iter()
        .map(|share| format!("**{}**", share.class.label()))
        .collect::<Vec<_>>();
    let noun = if labels.len() == 1 { "class" } else { "classes" };
    sentences.push(format!("Across these areas, {indicator} falls into the {} {noun}.", join_list(&labels)));

    sentences.push(format!(
        "The **{}** class is dominant, covering **{}%** of the precinct area.",
        dominant.class.label(),
        format_percent(dominant.share),
    ));

    if !others.is_empty() {
        let contrasts = others.iter()
            .map(|share| format!("**{}** covers **{}%**", share.class.label(), format_percent(share.share)))
            .collect::<Vec<_>>();
        sentences.push(format!("By contrast, {}.", join_list(&contrasts)));
    }

    sentences.push(format!(
        "Overall, the **{precinct}** precinct is dominantly characterized by **{}** {indicator} levels.",
        dominant.class.label(),
    ));

    sentences.join(" ")
}
