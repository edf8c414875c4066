use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use eyre::{eyre, Report, Result, WrapErr};
use gloo::file::callbacks::{read_as_text, FileReader};
use gloo::file::{File, ObjectUrl};
use gloo::timers::callback::Timeout;
use web_sys::{console, HtmlAudioElement, HtmlInputElement, HtmlMediaElement};
use yew::prelude::*;

use lyric_sync_lib::lrc::LyricTrack;
use lyric_sync_lib::time::format_time;
use lyric_sync_lib::LyricController;

use crate::fullscreen::{BrowserFullscreen, FullscreenProvider};

mod fullscreen;

enum Msg {
    LyricFiles(Result<Vec<File>>),
    LyricsLoaded(String, Result<LyricTrack>),
    AudioFiles(Result<Vec<File>>),
    Start,
    Playing,
    MetadataLoaded(f64),
    TimeUpdate(f64),
}

struct Main {
    readers: HashMap<String, FileReader>,
    controller: Option<LyricController>,
    title: Option<String>,
    audio: NodeRef,
    audio_url: Option<ObjectUrl>,
    line: Option<(f64, String)>,
    line_generation: u64,
    overlay_hidden: bool,
    fullscreen: Rc<dyn FullscreenProvider>,
    error: Option<Report>,
}

impl Main {
    fn show_line(&mut self, line: Option<(f64, String)>) -> bool {
        match line {
            None => false,
            Some(line) => {
                self.line = Some(line);
                // a fresh key remounts the line so its CSS transition replays
                self.line_generation += 1;
                true
            }
        }
    }

    fn audio_time(&self) -> f64 {
        self.audio
            .cast::<HtmlMediaElement>()
            .map_or(0.0, |audio| audio.current_time())
    }

    fn start_playback(&self) -> Result<()> {
        let audio = self
            .audio
            .cast::<HtmlAudioElement>()
            .ok_or_else(|| eyre!("no audio loaded"))?;
        audio.set_muted(false);
        audio
            .play()
            .map_err(|err| eyre!("playback failed: {:?}", err))?;
        Ok(())
    }

    fn schedule_fullscreen(&self) {
        let fullscreen = Rc::clone(&self.fullscreen);
        Timeout::new(100, move || {
            if let Err(err) = fullscreen.enter_fullscreen() {
                console::log_1(&format!("fullscreen unavailable: {err}").into());
            }
        })
        .forget();
    }
}

fn media_time(event: &Event) -> f64 {
    event
        .target_unchecked_into::<HtmlMediaElement>()
        .current_time()
}

fn read_lyrics(file_name: &str, contents: Result<String, impl Display>) -> Result<LyricTrack> {
    let raw = contents.map_err(|err| eyre!("failed to read {}: {}", file_name, err))?;
    LyricTrack::new(&raw).wrap_err_with(|| format!("failed to parse {file_name}"))
}

fn file_stem(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem)
        .to_owned()
}

impl Component for Main {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            readers: HashMap::default(),
            controller: None,
            title: None,
            audio: NodeRef::default(),
            audio_url: None,
            line: None,
            line_generation: 0,
            overlay_hidden: false,
            fullscreen: Rc::new(BrowserFullscreen),
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::LyricFiles(files) => {
                if let Ok(files_vec) = files {
                    for file in files_vec {
                        let file_name = file.name();
                        let task = {
                            let file_name = file_name.clone();
                            let link = ctx.link().clone();
                            read_as_text(&file, move |res| {
                                let track = read_lyrics(&file_name, res);
                                link.send_message(Msg::LyricsLoaded(file_name, track));
                            })
                        };
                        self.readers.insert(file_name, task);
                    }
                }
                false
            }
            Msg::LyricsLoaded(file_name, track) => {
                self.readers.remove(&file_name);
                match track {
                    Ok(track) => {
                        console::log_1(
                            &format!("{}: {} timed lines", file_name, track.len()).into(),
                        );
                        self.controller
                            .get_or_insert_with(LyricController::default)
                            .replace_track(track);
                        self.line = None;
                        if self.title.is_none() {
                            self.title = Some(file_stem(&file_name));
                        }
                        self.error = None;
                        let time = self.audio_time();
                        let line = self
                            .controller
                            .as_mut()
                            .and_then(|controller| controller.prime(time))
                            .map(|entry| (entry.time(), entry.text().to_owned()));
                        self.show_line(line);
                    }
                    Err(err) => {
                        console::log_1(&format!("{err:?}").into());
                        self.controller = None;
                        self.line = None;
                        self.error = Some(err);
                    }
                };
                true
            }
            Msg::AudioFiles(files) => match files.map(|files| files.into_iter().next()) {
                Ok(Some(file)) => {
                    self.title = Some(file_stem(&file.name()));
                    self.audio_url = Some(ObjectUrl::from(file));
                    self.overlay_hidden = false;
                    if let Some(controller) = self.controller.as_mut() {
                        controller.reset();
                    }
                    true
                }
                Ok(None) => false,
                Err(err) => {
                    self.error = Some(err);
                    true
                }
            },
            Msg::Start => {
                if let Err(err) = self.start_playback() {
                    console::log_1(&err.to_string().into());
                }
                false
            }
            Msg::Playing => {
                if self.overlay_hidden {
                    return false;
                }
                self.overlay_hidden = true;
                self.schedule_fullscreen();
                true
            }
            Msg::MetadataLoaded(time) => {
                let line = self
                    .controller
                    .as_mut()
                    .and_then(|controller| controller.prime(time))
                    .map(|entry| (entry.time(), entry.text().to_owned()));
                self.show_line(line)
            }
            Msg::TimeUpdate(time) => {
                let line = self
                    .controller
                    .as_mut()
                    .and_then(|controller| controller.update(time))
                    .map(|entry| (entry.time(), entry.text().to_owned()));
                self.show_line(line)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        fn helper(input: &HtmlInputElement) -> Result<Vec<File>> {
            if let Some(files) = input.files() {
                js_sys::try_iter(&files)
                    .unwrap_or(None)
                    .ok_or_else(|| eyre!("No file"))?
                    .map(|v| -> Result<web_sys::File> {
                        match v {
                            Ok(x) => Ok(web_sys::File::from(x)),
                            Err(_) => Err(eyre!("file loading error")),
                        }
                    })
                    .map(|v| {
                        let v2 = v?;
                        Ok(File::from(v2))
                    })
                    .collect()
            } else {
                Ok(Vec::new())
            }
        }

        let lyrics_empty = self
            .controller
            .as_ref()
            .map_or(false, |controller| controller.track().is_empty());
        let (stamp, text) = match &self.line {
            Some((time, text)) => (format_time(*time), text.clone()),
            None if lyrics_empty => (String::new(), "No lyrics available".to_owned()),
            None => (String::new(), String::new()),
        };
        let audio_src = self.audio_url.as_ref().map(|url| url.to_string());

        html! {
            <>
                <section id="controls">
                    <label>
                        { "Lyrics: " }
                        <input type="file" accept=".lrc,.txt" onchange={
                            ctx.link().callback(move |e: Event| Msg::LyricFiles(helper(&e.target_unchecked_into())))
                        }/>
                    </label>
                    <label>
                        { "Audio: " }
                        <input type="file" accept="audio/*" onchange={
                            ctx.link().callback(move |e: Event| Msg::AudioFiles(helper(&e.target_unchecked_into())))
                        }/>
                    </label>
                </section>

                <audio
                    ref={self.audio.clone()}
                    src={audio_src}
                    onplay={ctx.link().callback(|_| Msg::Playing)}
                    onloadedmetadata={ctx.link().callback(|e: Event| Msg::MetadataLoaded(media_time(&e)))}
                    ontimeupdate={ctx.link().callback(|e: Event| Msg::TimeUpdate(media_time(&e)))}
                />

                <main id="stage">
                    <p key={self.line_generation.to_string()} class={classes!("lyric-line", "show")}>{ text }</p>
                    <p class="timestamp">
                        { self.title.clone().unwrap_or_default() }
                        if !stamp.is_empty() {
                            <span class="time">{ stamp }</span>
                        }
                    </p>
                </main>

                if self.audio_url.is_some() {
                    <div class={classes!("overlay", self.overlay_hidden.then(|| "hidden"))}
                        onclick={ctx.link().callback(|_| Msg::Start)}>
                        <p>{ "Tap to play" }</p>
                    </div>
                }

                if let Some(err) = &self.error {
                    <>
                        <h1>{ "Error:" }</h1>
                        <p>{ err.to_string() }</p>
                    </>
                }
            </>
        }
    }
}

fn main() {
    yew::start_app::<Main>();
}
