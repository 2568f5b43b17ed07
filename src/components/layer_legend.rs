//! Sidebar legend: one row per layer with its total and, while something is
//! selected, how many of its entities are related.

use leptos::prelude::*;

use crate::topology::{LayerSummary, LayerType, layer_color};

fn count_text(summary: &LayerSummary) -> String {
	match summary.related {
		Some(related) => format!("{related} / {}", summary.total),
		None => summary.total.to_string(),
	}
}

#[component]
pub fn LayerLegend(
	#[prop(into)] summaries: Signal<Vec<LayerSummary>>,
	#[prop(into)] active: Signal<Option<LayerType>>,
	#[prop(into)] on_select: Callback<LayerType>,
) -> impl IntoView {
	view! {
		<ul class="layer-legend">
			{move || {
				let active = active.get();
				summaries
					.get()
					.into_iter()
					.map(|summary| {
						let layer = summary.layer;
						let class = if active == Some(layer) {
							"layer-row active"
						} else {
							"layer-row"
						};
						view! {
							<li class=class on:click=move |_| on_select.run(layer)>
								<span
									class="layer-swatch"
									style=format!("background: {};", layer_color(layer))
								/>
								<span class="layer-name">{layer.title()}</span>
								<span class="layer-count">{count_text(&summary)}</span>
							</li>
						}
					})
					.collect_view()
			}}
		</ul>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_show_related_only_while_selected() {
		let mut summary = LayerSummary {
			layer: LayerType::Host,
			total: 7,
			related: None,
		};
		assert_eq!(count_text(&summary), "7");
		summary.related = Some(2);
		assert_eq!(count_text(&summary), "2 / 7");
	}
}
