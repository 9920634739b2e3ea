use leptos::prelude::*;

use crate::graph::{NodeDetail, RelatedNode};

#[component]
fn RelatedList(
	title: &'static str,
	arrow: &'static str,
	related: Vec<RelatedNode>,
	on_select: Callback<String>,
) -> impl IntoView {
	if related.is_empty() {
		return None;
	}
	let items = related
		.into_iter()
		.map(|rel| {
			let id = rel.node_id.clone();
			view! {
				<li>
					<span class="rel-type">{rel.rel_type}</span>
					{arrow}
					<a href="#" on:click=move |ev| {
						ev.prevent_default();
						on_select.run(id.clone());
					}>{rel.node_name}</a>
				</li>
			}
		})
		.collect_view();
	Some(view! {
		<h4>{title}</h4>
		<ul class="relationships">{items}</ul>
	})
}

/// Side panel for the selected node. Clicking a related node selects it.
#[component]
pub fn NodeDetailsPanel(
	#[prop(into)] detail: Signal<Option<NodeDetail>>,
	on_select: Callback<String>,
	on_close: Callback<()>,
) -> impl IntoView {
	move || {
		detail.get().map(|detail| {
			let properties = detail
				.properties
				.into_iter()
				.map(|(key, value)| view! { <tr><th>{key}</th><td>{value}</td></tr> })
				.collect_view();
			view! {
				<aside class="node-details">
					<button class="close" on:click=move |_| on_close.run(())>"×"</button>
					<h2>{detail.name}</h2>
					<p class="node-type">{detail.node_type}</p>
					<table class="properties">{properties}</table>
					<RelatedList
						title="Incoming Relationships"
						arrow=" from "
						related=detail.incoming
						on_select=on_select
					/>
					<RelatedList
						title="Outgoing Relationships"
						arrow=" to "
						related=detail.outgoing
						on_select=on_select
					/>
				</aside>
			}
		})
	}
}
