use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;

fn is_fullscreen() -> bool {
	web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.fullscreen_element())
		.is_some()
}

/// Keep `active` in step with the document, including exits through Esc.
fn watch_fullscreen(active: RwSignal<bool>) {
	let Some(document) = web_sys::window().and_then(|w| w.document()) else {
		return;
	};
	let listener = Closure::<dyn FnMut()>::new(move || {
		let _ = active.try_set(is_fullscreen());
	});
	if let Err(err) = document
		.add_event_listener_with_callback("fullscreenchange", listener.as_ref().unchecked_ref())
	{
		warn!("Could not watch fullscreen changes: {err:?}");
		return;
	}
	// lives as long as the page
	listener.forget();
}

/// Toggle browser fullscreen on the element with id `target`.
#[component]
pub fn FullscreenToggle(target: &'static str) -> impl IntoView {
	let active = RwSignal::new(is_fullscreen());
	watch_fullscreen(active);

	let toggle = move |_| {
		let Some(document) = web_sys::window().and_then(|w| w.document()) else {
			return;
		};
		if is_fullscreen() {
			document.exit_fullscreen();
		} else if let Some(element) = document.get_element_by_id(target) {
			if let Err(err) = element.request_fullscreen() {
				warn!("Fullscreen request failed: {err:?}");
			}
		}
	};

	view! {
		<button class="fullscreen-toggle" on:click=toggle>
			{move || if active.get() { "Exit Fullscreen" } else { "Fullscreen" }}
		</button>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use super::*;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn leaving_fullscreen_outside_the_button_resets_the_flag() {
		let active = RwSignal::new(true);
		watch_fullscreen(active);

		let document = web_sys::window().and_then(|w| w.document()).unwrap();
		let event = web_sys::Event::new("fullscreenchange").unwrap();
		document.dispatch_event(&event).unwrap();

		assert!(!active.get_untracked());
	}
}
