use leptos::prelude::*;
use log::error;

use crate::components::layer_legend::LayerLegend;
use crate::components::topology_map::{Scene, TopologyMap, ViewportRequest};
use crate::topology::{Action, EngineConfig, LayerType, TopologyController};

/// Map, legend and view-mode toggle around one controller.
#[component]
fn Dashboard(controller: RwSignal<TopologyController>) -> impl IntoView {
	let viewport = RwSignal::new(None::<ViewportRequest>);

	let dispatch = move |action: Action| {
		let mut outcome = Ok(None);
		controller.update(|c| outcome = c.dispatch(action));
		match outcome {
			Ok(Some(command)) => viewport.update(|request| {
				let seq = request.map(|r| r.seq + 1).unwrap_or(0);
				*request = Some(ViewportRequest { seq, command });
			}),
			Ok(None) => {}
			Err(err) => error!("topology update failed: {err}"),
		}
	};

	let scene = Signal::derive(move || controller.with(Scene::capture));
	let summaries = Signal::derive(move || controller.with(|c| c.layer_summaries()));
	let active = Signal::derive(move || controller.with(|c| c.focus_layer()));
	let selected = move || {
		controller.with(|c| {
			c.selection()
				.selected_node_id()
				.and_then(|id| c.layout().node(id))
				.map(|node| format!("{} \u{00b7} {}", node.label, node.sub_label))
		})
	};
	let toggle_label = move || {
		controller.with(|c| format!("Show {}", c.view_mode().toggled().label().to_lowercase()))
	};

	view! {
		<div class="fullscreen-graph">
			<TopologyMap
				scene=scene
				viewport=viewport
				on_node_click=move |id: String| dispatch(Action::ClickNode(id))
				on_background_click=move |_: ()| dispatch(Action::ClickBackground)
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Smartscape"</h1>
				<p class="subtitle">"Click an entity to trace its dependencies. Drag to pan, scroll to zoom."</p>
				<button class="view-mode-toggle" on:click=move |_| dispatch(Action::ToggleViewMode)>
					{toggle_label}
				</button>
				<p class="selection">{move || selected().unwrap_or_default()}</p>
				<LayerLegend
					summaries=summaries
					active=active
					on_select=move |layer: LayerType| dispatch(Action::SelectLayer(layer))
				/>
			</div>
		</div>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = EngineConfig {
		seed: Some(js_sys::Date::now() as u64),
		..EngineConfig::default()
	};
	let controller = TopologyController::new(config).map(|c| {
		let controller = RwSignal::new(c);
		view! { <Dashboard controller=controller /> }
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{controller}
		</ErrorBoundary>
	}
}
