use eyre::{eyre, Result};
use gloo::timers::callback::Timeout;
use js_sys::{Function, Reflect};

/// Host capability for taking the page fullscreen. The lyric core never
/// sees this; only the page decides when to ask for it.
pub trait FullscreenProvider {
    fn enter_fullscreen(&self) -> Result<()>;
}

/// Fullscreen through the DOM, trying the standard API before the
/// vendor-prefixed ones. iOS Safari has no element fullscreen, so there the
/// page is nudged by one pixel to collapse the address bar instead.
pub struct BrowserFullscreen;

const REQUEST_METHODS: [&str; 4] = [
    "requestFullscreen",
    "webkitRequestFullscreen",
    "msRequestFullscreen",
    "mozRequestFullScreen",
];

impl FullscreenProvider for BrowserFullscreen {
    fn enter_fullscreen(&self) -> Result<()> {
        let window = web_sys::window().ok_or_else(|| eyre!("no window"))?;
        let navigator = window.navigator();
        let user_agent = navigator.user_agent().unwrap_or_default();
        let platform = navigator.platform().unwrap_or_default();
        if is_ios(&user_agent, &platform, navigator.max_touch_points()) {
            window.scroll_to_with_x_and_y(0.0, 1.0);
            Timeout::new(100, move || window.scroll_to_with_x_and_y(0.0, 0.0)).forget();
            return Ok(());
        }

        let element = window
            .document()
            .and_then(|document| document.document_element())
            .ok_or_else(|| eyre!("no document element"))?;
        for name in REQUEST_METHODS {
            let method = match Reflect::get(&element, &name.into()) {
                Ok(value) if value.is_function() => Function::from(value),
                _ => continue,
            };
            return method
                .call0(&element)
                .map(|_| ())
                .map_err(|err| eyre!("{} failed: {:?}", name, err));
        }
        Err(eyre!("fullscreen is not supported by this browser"))
    }
}

fn is_ios(user_agent: &str, platform: &str, max_touch_points: i32) -> bool {
    ["iPad", "iPhone", "iPod"]
        .iter()
        .any(|device| user_agent.contains(device))
        // iPadOS reports itself as a touch-capable Mac
        || (platform == "MacIntel" && max_touch_points > 1)
}
