use crate::events::AppEvent;
use crate::gui::painter::{CairoPainter, IconCache};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use crate::session::Session;
use gtk::prelude::*;
use gtk4 as gtk;
use pager::config::KeyAction;
use pager::controller::{MenuController, MenuInput, Notice, NoticeKind};
use pager::geometry::{Point, Rect};
use pager::host::Launch;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

const NOTICE_SECONDS: u32 = 2;

type TooltipRegions = Rc<RefCell<Vec<(Rect, String)>>>;

pub struct AppModel {
    pub session: Session,
    pub controller: Rc<RefCell<Option<MenuController>>>,
    pub tooltips: TooltipRegions,
    pub notice: Option<Notice>,
    pub notice_serial: u64,
    pub visible: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    ShowBuild,
    Hide,
    Press(u32, Point),
    Key(String),
    CursorMove(Point),
    ConfigReload,
    ClearNotice(u64),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::ShowBuild => AppMsg::ShowBuild,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Session, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Pager"),
            #[watch]
            set_visible: model.visible,
            add_css_class: "pager-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key.name() {
                        Some(name) => {
                            sender.input(AppMsg::Key(name.to_string()));
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "pager-drawing-area",
                    set_has_tooltip: true,

                    add_controller = gtk::EventControllerMotion {
                        connect_motion[sender] => move |_, x, y| {
                            sender.input(AppMsg::CursorMove(Point::new(x, y)));
                        }
                    },

                    add_controller = gtk::GestureClick {
                        set_button: 0, // Listen to all buttons
                        connect_pressed[sender] => move |gesture, _, x, y| {
                            sender.input(AppMsg::Press(gesture.current_button(), Point::new(x, y)));
                        }
                    }
                },

                add_overlay = &gtk::Label {
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::End,
                    set_margin_bottom: 80,
                    set_can_target: false,
                    #[watch]
                    set_visible: model.notice.is_some(),
                    #[watch]
                    set_label: model.notice.as_ref().map(|n| n.text.as_str()).unwrap_or_default(),
                    #[watch]
                    set_css_classes: notice_classes(model.notice.as_ref()),
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (session, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let model = AppModel {
            session,
            controller: Rc::new(RefCell::new(None)),
            tooltips: Rc::new(RefCell::new(Vec::new())),
            notice: None,
            notice_serial: 0,
            visible: false,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let controller_draw = model.controller.clone();
        let tooltips_draw = model.tooltips.clone();
        let icons = IconCache::default();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let controller = controller_draw.borrow();
                let Some(menu) = controller.as_ref().filter(|m| m.is_open()) else {
                    tooltips_draw.borrow_mut().clear();
                    return;
                };

                let colors = ThemeColors::from_context(&drawing_area.style_context());
                let origin = menu.window().origin();
                cr.translate(origin.x, origin.y);

                let mut painter = CairoPainter::new(cr, &icons, &colors);
                if let Err(e) = menu.draw(&mut painter) {
                    log::error!("Drawing error: {}", e);
                }
                *tooltips_draw.borrow_mut() = painter
                    .into_tooltips()
                    .into_iter()
                    .map(|(r, text)| (Rect::new(r.x + origin.x, r.y + origin.y, r.width, r.height), text))
                    .collect();
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                if self.menu_open() {
                    self.feed(MenuInput::ToggleMenu, &sender);
                } else {
                    self.session.show_abilities();
                    self.process_launches(&sender);
                }
            }
            AppMsg::ShowBuild => {
                if !self.menu_open() {
                    self.session.show_build();
                    self.process_launches(&sender);
                }
            }
            AppMsg::Hide => self.close_menu(),
            AppMsg::Press(button, point) => {
                if !self.menu_open() {
                    // only a notice is up
                    self.clear_notice();
                    return;
                }
                self.track(point);
                match button {
                    1 => self.feed(MenuInput::Primary, &sender),
                    3 => self.feed(MenuInput::Secondary, &sender),
                    _ => {}
                }
            }
            AppMsg::Key(name) => {
                let input = if name == "Escape" {
                    Some(MenuInput::Cancel)
                } else {
                    match self.session.settings().keys.action_for(&name) {
                        Some(KeyAction::NextPage) => Some(MenuInput::NextPageKey),
                        Some(KeyAction::PreviousPage) => Some(MenuInput::PreviousPageKey),
                        Some(KeyAction::OpenMenu) => Some(MenuInput::ToggleMenu),
                        Some(KeyAction::OpenBuildMenu) | None => None,
                    }
                };
                if let Some(input) = input
                    && self.menu_open()
                {
                    self.feed(input, &sender);
                }
            }
            AppMsg::CursorMove(point) => {
                if self.menu_open() {
                    self.track(point);
                }
            }
            AppMsg::ConfigReload => {
                self.close_menu();
                match self.session.reload() {
                    Ok(()) => log::info!("Configuration reloaded"),
                    Err(e) => log::error!("Failed to reload config: {}", e),
                }
            }
            AppMsg::ClearNotice(serial) => {
                if serial == self.notice_serial {
                    self.clear_notice();
                }
            }
        }
        self.visible = self.menu_open() || self.notice.is_some();
    }
}

impl AppModel {
    fn menu_open(&self) -> bool {
        self.controller
            .borrow()
            .as_ref()
            .is_some_and(MenuController::is_open)
    }

    fn close_menu(&mut self) {
        if self.controller.borrow_mut().take().is_some() {
            self.drawing_area.set_tooltip_text(None);
            self.drawing_area.queue_draw();
        }
    }

    /// Polls the menu with a new pointer position and refreshes hover feedback.
    fn track(&mut self, point: Point) {
        let update = match self.controller.borrow_mut().as_mut() {
            Some(menu) => menu.frame(point),
            None => return,
        };
        if update.resized {
            log::debug!("Menu window resized");
        }
        if update.redraw {
            self.drawing_area.queue_draw();
        }

        let tooltip = self
            .tooltips
            .borrow()
            .iter()
            .find(|(region, _)| region.contains(point))
            .map(|(_, text)| text.clone());
        self.drawing_area.set_tooltip_text(tooltip.as_deref());
    }

    fn feed(&mut self, input: MenuInput, sender: &ComponentSender<Self>) {
        let response = match self.controller.borrow_mut().as_mut() {
            Some(menu) => menu.handle(input),
            None => return,
        };

        if let Some(notice) = response.notice {
            if input == MenuInput::Secondary {
                self.session.save_favorites();
            }
            self.show_notice(notice, sender);
        }
        if !self.menu_open() {
            self.close_menu();
        }
        self.drawing_area.queue_draw();
        self.process_launches(sender);
    }

    /// Applies whatever the host adapter asked for while handling the last event.
    fn process_launches(&mut self, sender: &ComponentSender<Self>) {
        for launch in self.session.drain_launches() {
            match launch {
                Launch::Open {
                    items,
                    favorites_view,
                } => {
                    let mut menu = MenuController::open(
                        items,
                        favorites_view,
                        self.session.context(),
                        self.session.layout(),
                        window::monitor_size(&self.root),
                    );
                    if let Some(cursor) = window::get_cursor_position(&self.root) {
                        menu.frame(cursor);
                    }
                    *self.controller.borrow_mut() = Some(menu);
                    self.drawing_area.queue_draw();
                }
                Launch::Notify(notice) => self.show_notice(notice, sender),
            }
        }
    }

    fn show_notice(&mut self, notice: Notice, sender: &ComponentSender<Self>) {
        if notice.kind == NoticeKind::Rejected {
            self.root.error_bell();
        }
        log::info!("{}", notice.text);
        self.notice = Some(notice);
        self.notice_serial += 1;

        let serial = self.notice_serial;
        let sender = sender.clone();
        glib::timeout_add_seconds_local_once(NOTICE_SECONDS, move || {
            sender.input(AppMsg::ClearNotice(serial));
        });
    }

    fn clear_notice(&mut self) {
        self.notice = None;
    }
}

fn notice_classes(notice: Option<&Notice>) -> &'static [&'static str] {
    match notice.map(|n| n.kind) {
        Some(NoticeKind::Rejected) => &["pager-notice", "rejected"],
        _ => &["pager-notice"],
    }
}
