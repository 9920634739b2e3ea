use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};

use crate::components::details::NodeDetailsPanel;
use crate::components::force_graph::{CanvasCommand, ForceGraphCanvas};
use crate::components::fullscreen::FullscreenToggle;
use crate::components::sidebar::{GraphStats, LayoutPicker, Legend, SearchBox, TypeFilters};
use crate::config::ExplorerConfig;
use crate::explorer::{Explorer, SearchOutcome};
use crate::graph::{ElementSet, StyleRegistry, loader};

#[derive(Clone, Debug, PartialEq)]
enum LoadState {
	Loading,
	Ready,
	Failed(String),
}

/// The explorer page: sidebar, canvas and detail panel.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<ExplorerConfig>().unwrap_or_default();
	let registry = use_context::<StyleRegistry>().unwrap_or_default();

	let load_state = RwSignal::new(LoadState::Loading);
	let explorer: RwSignal<Option<Explorer>> = RwSignal::new(None);
	let elements = RwSignal::new(Arc::new(ElementSet::default()));
	let command: RwSignal<Option<CanvasCommand>> = RwSignal::new(None);
	let notice: RwSignal<Option<String>> = RwSignal::new(None);

	let classes = Memo::new(move |_| {
		explorer.with(|e| e.as_ref().map(Explorer::classes).unwrap_or_default())
	});
	let detail = Signal::derive(move || {
		explorer.with(|e| e.as_ref().and_then(|e| e.selection().cloned()))
	});
	let layouts: Vec<String> = config.layout_chain().map(str::to_owned).collect();
	let default_layout = config.default_layout.clone();

	let load = Callback::new(move |()| {
		let (config, registry) = (config.clone(), registry.clone());
		load_state.set(LoadState::Loading);
		notice.set(None);
		spawn_local(async move {
			let url = config.request_url(loader::now_ms());
			match loader::load(&url).await {
				Ok(doc) => {
					let loaded = Explorer::new(&doc, &registry, &config);
					elements.set(Arc::clone(loaded.elements()));
					explorer.set(Some(loaded));
					load_state.set(LoadState::Ready);
				}
				Err(err) => {
					error!("Error loading graph data: {err}");
					explorer.set(None);
					elements.set(Arc::new(ElementSet::default()));
					load_state.set(LoadState::Failed(err.to_string()));
				}
			}
		});
	});
	load.run(());

	let select = move |id: String| {
		explorer.update(|e| {
			if let Some(e) = e {
				e.select_node(&id);
			}
		});
	};

	let on_tap = Callback::new(move |tapped: Option<String>| match tapped {
		Some(id) => select(id),
		None => explorer.update(|e| {
			if let Some(e) = e {
				e.clear_selection();
			}
		}),
	});

	let on_related = Callback::new(move |id: String| {
		select(id.clone());
		command.set(Some(CanvasCommand::Center(id)));
	});

	let on_close = Callback::new(move |()| {
		explorer.update(|e| {
			if let Some(e) = e {
				e.close_details();
			}
		})
	});

	let on_search = Callback::new(move |query: String| {
		let mut outcome = SearchOutcome::EmptyQuery;
		explorer.update(|e| {
			if let Some(e) = e {
				outcome = e.search(&query);
			}
		});
		match outcome {
			SearchOutcome::EmptyQuery => notice.set(None),
			SearchOutcome::NoMatches => {
				info!("No matches found for: {query}");
				notice.set(Some(format!("No matches found for: {query}")));
			}
			SearchOutcome::Matches(ids) => {
				notice.set(None);
				command.set(Some(CanvasCommand::Fit(ids)));
			}
		}
	});

	let on_layout = Callback::new(move |name: String| {
		command.set(Some(CanvasCommand::ApplyLayout(name)));
	});

	view! {
		<div class="explorer">
			<aside class="sidebar">
				<h1>"Knowledge Graph Explorer"</h1>
				<SearchBox on_search=on_search notice=notice />
				<LayoutPicker initial=default_layout on_apply=on_layout />
				<TypeFilters explorer=explorer />
				<Legend />
				<GraphStats explorer=explorer />
				<div class="actions">
					<button on:click=move |_| load.run(())>"Reload Data"</button>
					<FullscreenToggle target="graph-container" />
				</div>
			</aside>

			<main id="graph-container" class="graph-container">
				<ForceGraphCanvas
					elements=elements
					classes=classes
					commands=command
					on_tap=on_tap
					layouts=layouts
				/>
				{move || match load_state.get() {
					LoadState::Loading => {
						Some(view! { <div class="overlay loading">"Loading graph data..."</div> }.into_any())
					}
					LoadState::Failed(message) => {
						Some(
							view! {
								<div class="overlay error">
									<h2>"Error loading graph data"</h2>
									<p>{message}</p>
								</div>
							}
								.into_any(),
						)
					}
					LoadState::Ready => None,
				}}
				<NodeDetailsPanel detail=detail on_select=on_related on_close=on_close />
			</main>
		</div>
	}
}
