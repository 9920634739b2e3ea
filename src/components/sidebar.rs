//! Sidebar controls: type filters, legend, search, layout picker and stats.

use leptos::prelude::*;

use crate::explorer::Explorer;
use crate::graph::StyleRegistry;
use crate::graph::style::LineStyle;

#[component]
fn FilterCheckbox(
	label: String,
	color: &'static str,
	#[prop(into)] checked: Signal<bool>,
	on_toggle: Callback<bool>,
) -> impl IntoView {
	view! {
		<label class="filter-item">
			<input
				type="checkbox"
				prop:checked=checked
				on:change=move |ev| on_toggle.run(event_target_checked(&ev))
			/>
			<span class="swatch" style:background-color=color></span>
			{label}
		</label>
	}
}

/// Checkboxes for every discovered node and relationship type.
#[component]
pub fn TypeFilters(explorer: RwSignal<Option<Explorer>>) -> impl IntoView {
	let registry = use_context::<StyleRegistry>().unwrap_or_default();
	let node_registry = registry.clone();
	let node_types =
		move || explorer.with(|e| e.as_ref().map(Explorer::node_types).unwrap_or_default());
	let relationship_types =
		move || explorer.with(|e| e.as_ref().map(Explorer::relationship_types).unwrap_or_default());

	view! {
		<section class="filters">
			<h3>"Node Types"</h3>
			<For
				each=node_types
				key=|node_type| node_type.clone()
				children=move |node_type| {
					let color = node_registry.node_style(&node_type).color;
					let (read, write) = (node_type.clone(), node_type.clone());
					view! {
						<FilterCheckbox
							label=node_type
							color=color
							checked=Signal::derive(move || {
								explorer.with(|e| {
									e.as_ref().is_some_and(|e| e.filter().node_types.contains(&read))
								})
							})
							on_toggle=Callback::new(move |enabled| {
								explorer.update(|e| {
									if let Some(e) = e {
										e.set_node_type_enabled(&write, enabled);
									}
								})
							})
						/>
					}
				}
			/>
			<h3>"Relationship Types"</h3>
			<For
				each=relationship_types
				key=|rel_type| rel_type.clone()
				children=move |rel_type| {
					let color = registry.relationship_style(&rel_type).color;
					let (read, write) = (rel_type.clone(), rel_type.clone());
					view! {
						<FilterCheckbox
							label=rel_type
							color=color
							checked=Signal::derive(move || {
								explorer.with(|e| {
									e.as_ref()
										.is_some_and(|e| e.filter().relationship_types.contains(&read))
								})
							})
							on_toggle=Callback::new(move |enabled| {
								explorer.update(|e| {
									if let Some(e) = e {
										e.set_relationship_type_enabled(&write, enabled);
									}
								})
							})
						/>
					}
				}
			/>
			<button
				class="reset-filters"
				on:click=move |_| {
					explorer.update(|e| {
						if let Some(e) = e {
							e.reset_filters();
						}
					})
				}
			>
				"Reset Filters"
			</button>
		</section>
	}
}

/// Every type the style registry knows about, with its color.
#[component]
pub fn Legend() -> impl IntoView {
	let registry = use_context::<StyleRegistry>().unwrap_or_default();
	let nodes = registry
		.node_types()
		.map(|(name, style)| {
			view! {
				<li class="legend-item">
					<span class="swatch" style:background-color=style.color></span>
					{name}
				</li>
			}
		})
		.collect_view();
	let relationships = registry
		.relationship_types()
		.map(|(name, style)| {
			let line = match style.line {
				LineStyle::Solid => "solid",
				LineStyle::Dashed => "dashed",
				LineStyle::Dotted => "dotted",
			};
			view! {
				<li class="legend-item">
					<span
						class="line-sample"
						style:border-top=format!("{}px {} {}", style.width.max(2.0), line, style.color)
					></span>
					{name}
				</li>
			}
		})
		.collect_view();

	view! {
		<section class="legend">
			<h3>"Legend"</h3>
			<ul>{nodes}</ul>
			<ul>{relationships}</ul>
		</section>
	}
}

/// Search input submitted with the button or Enter.
#[component]
pub fn SearchBox(
	on_search: Callback<String>,
	#[prop(into)] notice: Signal<Option<String>>,
) -> impl IntoView {
	let query = RwSignal::new(String::new());
	let submit = move || on_search.run(query.get_untracked().trim().to_owned());

	view! {
		<section class="search">
			<input
				type="text"
				placeholder="Search nodes..."
				prop:value=query
				on:input=move |ev| query.set(event_target_value(&ev))
				on:keydown=move |ev| {
					if ev.key() == "Enter" {
						submit();
					}
				}
			/>
			<button on:click=move |_| submit()>"Search"</button>
			<Show when=move || notice.get().is_some()>
				<p class="search-notice">{move || notice.get().unwrap_or_default()}</p>
			</Show>
		</section>
	}
}

/// Dropdown of the registry's named layouts.
#[component]
pub fn LayoutPicker(initial: String, on_apply: Callback<String>) -> impl IntoView {
	let registry = use_context::<StyleRegistry>().unwrap_or_default();
	let names: Vec<String> = registry.layout_names().map(str::to_owned).collect();
	let selected = RwSignal::new(initial);

	view! {
		<section class="layout-picker">
			<h3>"Layout"</h3>
			<select on:change=move |ev| selected.set(event_target_value(&ev))>
				{names
					.into_iter()
					.map(|name| {
						let (value, current) = (name.clone(), name.clone());
						view! {
							<option
								value=value
								selected=move || selected.with(|s| *s == current)
							>
								{name}
							</option>
						}
					})
					.collect_view()}
			</select>
			<button on:click=move |_| on_apply.run(selected.get_untracked())>"Apply"</button>
		</section>
	}
}

/// Visible and total counts.
#[component]
pub fn GraphStats(explorer: RwSignal<Option<Explorer>>) -> impl IntoView {
	let counts = move || {
		explorer.with(|e| {
			e.as_ref().map_or((0, 0, 0, 0), |e| {
				let (nodes, edges) = (e.elements().nodes().len(), e.elements().edges().len());
				(
					nodes.saturating_sub(e.hidden().nodes.len()),
					nodes,
					edges.saturating_sub(e.hidden().edges.len()),
					edges,
				)
			})
		})
	};

	view! {
		<section class="stats">
			<p>
				{move || {
					let (visible, total, _, _) = counts();
					format!("Nodes: {visible} / {total}")
				}}
			</p>
			<p>
				{move || {
					let (_, _, visible, total) = counts();
					format!("Relationships: {visible} / {total}")
				}}
			</p>
		</section>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use super::*;
	use wasm_bindgen::JsCast;
	use wasm_bindgen_test::*;

	#[wasm_bindgen_test]
	fn layout_picker_lists_every_named_layout() {
		leptos::mount::mount_to_body(|| {
			view! { <LayoutPicker initial="circle".to_owned() on_apply=Callback::new(|_: String| {}) /> }
		});

		let document = web_sys::window().and_then(|w| w.document()).unwrap();
		let options = document.query_selector_all(".layout-picker option").unwrap();
		let values: Vec<String> = (0..options.length())
			.filter_map(|i| options.item(i))
			.filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
			.filter_map(|el| el.get_attribute("value"))
			.collect();
		let expected: Vec<String> = StyleRegistry::default().layout_names().map(str::to_owned).collect();
		assert_eq!(values, expected);
	}
}
